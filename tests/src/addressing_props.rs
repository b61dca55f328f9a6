//! Property tests over the coil address space.

use proptest::prelude::*;

use rio_core::registers::RegisterStore;
use rio_core::types::{coil_target, Bank, CoilTarget, COIL_ADDR_SPACE, OE_COIL_ADDR};

proptest! {
    /// Bank-1 outputs always resolve as address 16 + k
    #[test]
    fn bank1_addresses_resolve_to_their_channel(k in 0usize..10) {
        prop_assert_eq!(
            coil_target(16 + k as u16),
            CoilTarget::Output { bank: Bank::Bank1, channel: k }
        );
    }

    /// No reserved or mirror address ever resolves to a physical channel
    #[test]
    fn only_output_ranges_resolve_to_channels(addr in 0u16..1024) {
        let is_output_range = addr < 10 || (16..26).contains(&addr);
        match coil_target(addr) {
            CoilTarget::Output { .. } => prop_assert!(is_output_range),
            CoilTarget::OutputEnable => prop_assert_eq!(addr, OE_COIL_ADDR),
            CoilTarget::Reserved => prop_assert!(!is_output_range && addr != OE_COIL_ADDR),
        }
    }

    /// Writing one coil never disturbs any other coil bit
    #[test]
    fn coil_writes_are_bit_isolated(
        background in proptest::collection::vec((0u16..COIL_ADDR_SPACE, any::<bool>()), 0..16),
        addr in 0u16..COIL_ADDR_SPACE,
        on in any::<bool>(),
    ) {
        let store = RegisterStore::new();
        for (a, v) in &background {
            store.write_coil(*a, *v);
        }
        let mut expected: Vec<bool> = (0..COIL_ADDR_SPACE).map(|a| store.coil(a)).collect();

        store.write_coil(addr, on);
        expected[addr as usize] = on;

        for a in 0..COIL_ADDR_SPACE {
            prop_assert_eq!(store.coil(a), expected[a as usize], "addr {}", a);
        }
    }

    /// Readback always matches the last write, across the whole space
    #[test]
    fn coil_readback_matches_last_write(addr in 0u16..COIL_ADDR_SPACE, on in any::<bool>()) {
        let store = RegisterStore::new();
        store.write_coil(addr, !on);
        store.write_coil(addr, on);
        prop_assert_eq!(store.coil(addr), on);
    }
}
