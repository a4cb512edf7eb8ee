//! Addresses that never hold user-deployed code.

use comb_core_types::{
    Address,
    Bytes32,
    U256,
};
use once_cell::sync::Lazy;
use std::collections::BTreeSet;

const fn low_address(high: u8, low: u8) -> Address {
    Address::new([0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, high, low])
}

pub const ECRECOVER: Address = low_address(0, 1);
pub const SHA256: Address = low_address(0, 2);
pub const RIPEMD160: Address = low_address(0, 3);
pub const IDENTITY: Address = low_address(0, 4);
pub const MODEXP: Address = low_address(0, 5);
pub const BN256_ADD: Address = low_address(0, 6);
pub const BN256_SCALAR_MUL: Address = low_address(0, 7);
pub const BN256_PAIRING: Address = low_address(0, 8);

pub const COMB_COIN: Address = low_address(0, 100);
pub const COMB_STAMP: Address = low_address(0, 200);

/// Number of outstanding one-time keys per denomination.
pub const OTA_BALANCE_STORAGE: Address = low_address(0x01, 0x2c);
/// One-time keys that were refunded.
pub const OTA_IMAGE_STORAGE: Address = low_address(0x01, 0x2d);

/// Coin denominations in base units: 10, 20, 50, 100, 200, 500, 1000, 5000 and 50000 comb.
pub const COIN_DENOMINATIONS: [u128; 9] = [
    10_000_000_000_000_000_000,
    20_000_000_000_000_000_000,
    50_000_000_000_000_000_000,
    100_000_000_000_000_000_000,
    200_000_000_000_000_000_000,
    500_000_000_000_000_000_000,
    1_000_000_000_000_000_000_000,
    5_000_000_000_000_000_000_000,
    50_000_000_000_000_000_000_000,
];

/// Stamp denominations in base units, from 0.001 to 0.5 comb.
pub const STAMP_DENOMINATIONS: [u128; 11] = [
    1_000_000_000_000_000,
    2_000_000_000_000_000,
    3_000_000_000_000_000,
    5_000_000_000_000_000,
    6_000_000_000_000_000,
    9_000_000_000_000_000,
    30_000_000_000_000_000,
    60_000_000_000_000_000,
    90_000_000_000_000_000,
    200_000_000_000_000_000,
    500_000_000_000_000_000,
];

/// The address keeping the one-time keys of a denomination: the amount in base units,
/// big-endian.
pub fn denomination_address(amount: u128) -> Address {
    amount_word(U256::from(amount)).to_address()
}

pub(crate) fn amount_word(amount: U256) -> Bytes32 {
    let mut word = [0u8; Bytes32::LEN];
    amount.to_big_endian(&mut word);
    Bytes32::from(word)
}

/// Why an address is reserved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reservation {
    /// A native contract, by name.
    Native(&'static str),
    OtaBalance,
    OtaImage,
    CoinDenomination(u128),
    StampDenomination(u128),
}

/// Every reserved address with the reason it is reserved.
#[derive(Debug)]
pub struct ReservedAddresses {
    entries: Vec<(Address, Reservation)>,
    addresses: BTreeSet<Address>,
}

static RESERVED: Lazy<ReservedAddresses> = Lazy::new(|| {
    let native = [
        (ECRECOVER, "ecrecover"),
        (SHA256, "sha256"),
        (RIPEMD160, "ripemd160"),
        (IDENTITY, "identity"),
        (MODEXP, "modexp"),
        (BN256_ADD, "bn256_add"),
        (BN256_SCALAR_MUL, "bn256_scalar_mul"),
        (BN256_PAIRING, "bn256_pairing"),
        (COMB_COIN, "comb_coin"),
        (COMB_STAMP, "comb_stamp"),
    ]
    .into_iter()
    .map(|(address, name)| (address, Reservation::Native(name)));
    let bookkeeping = [
        (OTA_BALANCE_STORAGE, Reservation::OtaBalance),
        (OTA_IMAGE_STORAGE, Reservation::OtaImage),
    ];
    let coins = COIN_DENOMINATIONS.into_iter().map(|amount| {
        (
            denomination_address(amount),
            Reservation::CoinDenomination(amount),
        )
    });
    let stamps = STAMP_DENOMINATIONS.into_iter().map(|amount| {
        (
            denomination_address(amount),
            Reservation::StampDenomination(amount),
        )
    });

    let entries: Vec<_> = native.chain(bookkeeping).chain(coins).chain(stamps).collect();
    let addresses = entries.iter().map(|(address, _)| *address).collect();
    ReservedAddresses { entries, addresses }
});

impl ReservedAddresses {
    pub fn all() -> &'static Self {
        &RESERVED
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.addresses.contains(address)
    }

    pub fn reservation(&self, address: &Address) -> Option<Reservation> {
        self.entries
            .iter()
            .find(|(reserved, _)| reserved == address)
            .map(|(_, reservation)| *reservation)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Address, Reservation)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PrecompileSet;

    #[test]
    fn reserved_addresses_are_disjoint() {
        let reserved = ReservedAddresses::all();
        let unique: BTreeSet<_> = reserved.iter().map(|(address, _)| *address).collect();
        assert_eq!(unique.len(), reserved.len());
        assert_eq!(reserved.len(), 10 + 2 + 9 + 11);
    }

    #[test]
    fn low_addresses_have_expected_values() {
        assert_eq!(ECRECOVER, Address::from_low_u64_be(1));
        assert_eq!(BN256_PAIRING, Address::from_low_u64_be(8));
        assert_eq!(COMB_COIN, Address::from_low_u64_be(100));
        assert_eq!(COMB_STAMP, Address::from_low_u64_be(200));
        assert_eq!(OTA_BALANCE_STORAGE, Address::from_low_u64_be(300));
        assert_eq!(OTA_IMAGE_STORAGE, Address::from_low_u64_be(301));
    }

    #[test]
    fn denomination_address_is_the_amount() {
        // 0.001 comb = 10^15 = 0x038d7ea4c68000
        assert_eq!(
            denomination_address(STAMP_DENOMINATIONS[0]).to_string(),
            "0x00000000000000000000000000038d7ea4c68000"
        );
        assert_eq!(
            ReservedAddresses::all().reservation(&denomination_address(COIN_DENOMINATIONS[8])),
            Some(Reservation::CoinDenomination(COIN_DENOMINATIONS[8]))
        );
    }

    #[test]
    fn native_reservations_match_the_registry() {
        let reserved = ReservedAddresses::all();
        for (address, contract) in PrecompileSet::Byzantium.contracts() {
            assert_eq!(
                reserved.reservation(address),
                Some(Reservation::Native(contract.name()))
            );
        }
    }
}
