//! The nine switchable power-line categories and their bitmask registers.

use serde::{Deserialize, Serialize};

/// Number of unit-line categories (`LogicUnitId` ranges over `0..NUM_CATEGORIES`).
pub const NUM_CATEGORIES: usize = 9;

/// One of the nine closed categories of switchable power lines, addressed by
/// `LogicUnitId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum UnitLineCategory {
    HighPwHeaterEnSel = 0,
    LowPwHeaterEnSel = 1,
    ReactionWheelEnSel = 2,
    PropEnSel = 3,
    AvionicLoadEnSel = 4,
    HdrmEnSel = 5,
    IsolatedLdoEnSel = 6,
    IsolatedPwEnSel = 7,
    ThermAndFlybackEnSel = 8,
}

impl UnitLineCategory {
    pub const ALL: [UnitLineCategory; NUM_CATEGORIES] = [
        UnitLineCategory::HighPwHeaterEnSel,
        UnitLineCategory::LowPwHeaterEnSel,
        UnitLineCategory::ReactionWheelEnSel,
        UnitLineCategory::PropEnSel,
        UnitLineCategory::AvionicLoadEnSel,
        UnitLineCategory::HdrmEnSel,
        UnitLineCategory::IsolatedLdoEnSel,
        UnitLineCategory::IsolatedPwEnSel,
        UnitLineCategory::ThermAndFlybackEnSel,
    ];

    /// Resolve a `LogicUnitId` (`0..9`) to its category, or `None` if out of range.
    pub fn from_logic_unit_id(id: u8) -> Option<Self> {
        UnitLineCategory::ALL.get(id as usize).copied()
    }

    pub fn logic_unit_id(self) -> u8 {
        self as u8
    }

    /// The ICD name used as the key in `PduUnitLineStates`.
    pub fn name(self) -> &'static str {
        match self {
            UnitLineCategory::HighPwHeaterEnSel => "HighPwHeaterEnSel",
            UnitLineCategory::LowPwHeaterEnSel => "LowPwHeaterEnSel",
            UnitLineCategory::ReactionWheelEnSel => "ReactionWheelEnSel",
            UnitLineCategory::PropEnSel => "PropEnSel",
            UnitLineCategory::AvionicLoadEnSel => "AvionicLoadEnSel",
            UnitLineCategory::HdrmEnSel => "HdrmEnSel",
            UnitLineCategory::IsolatedLdoEnSel => "IsolatedLdoEnSel",
            UnitLineCategory::IsolatedPwEnSel => "IsolatedPwEnSel",
            UnitLineCategory::ThermAndFlybackEnSel => "ThermAndFlybackEnSel",
        }
    }

    /// The ICD name used as the key in `PduConvertedMeasurements`.
    pub fn adc_label(self) -> &'static str {
        match self {
            UnitLineCategory::HighPwHeaterEnSel => "HighPwHeaterAdcSel",
            UnitLineCategory::LowPwHeaterEnSel => "LowPwHeaterAdcSel",
            UnitLineCategory::ReactionWheelEnSel => "ReactionWheelAdcSel",
            UnitLineCategory::PropEnSel => "PropAdcSel",
            UnitLineCategory::AvionicLoadEnSel => "AvionicLoadAdcSel",
            UnitLineCategory::HdrmEnSel => "HdrmAdcSel",
            UnitLineCategory::IsolatedLdoEnSel => "IsolatedLdoAdcSel",
            UnitLineCategory::IsolatedPwEnSel => "IsolatedPwAdcSel",
            UnitLineCategory::ThermAndFlybackEnSel => "ThermAndFlybackAdcSel",
        }
    }

    /// Number of addressable lines in this category.
    pub fn width(self) -> u8 {
        match self {
            UnitLineCategory::ReactionWheelEnSel => 4,
            _ => 16,
        }
    }

    /// Nominal per-line current draw in amperes, used by the measurement engine.
    pub fn nominal_current_a(self) -> f32 {
        match self {
            UnitLineCategory::HighPwHeaterEnSel => 2.0,
            UnitLineCategory::LowPwHeaterEnSel => 0.5,
            UnitLineCategory::ReactionWheelEnSel => 5.0,
            UnitLineCategory::PropEnSel => 1.5,
            UnitLineCategory::AvionicLoadEnSel => 0.8,
            UnitLineCategory::HdrmEnSel => 3.0,
            UnitLineCategory::IsolatedLdoEnSel => 0.3,
            UnitLineCategory::IsolatedPwEnSel => 1.0,
            UnitLineCategory::ThermAndFlybackEnSel => 1.2,
        }
    }

    /// Bitmask with exactly the bits within this category's width set.
    fn width_mask(self) -> u16 {
        if self.width() >= 16 {
            0xFFFF
        } else {
            (1u16 << self.width()) - 1
        }
    }
}

/// The nine `u16` bitmask registers, one per category. No aliasing between
/// categories; out-of-width bits always read zero.
#[derive(Debug, Clone)]
pub struct LineRegisters {
    lines: [u16; NUM_CATEGORIES],
}

impl LineRegisters {
    pub fn new() -> Self {
        Self { lines: [0; NUM_CATEGORIES] }
    }

    pub fn get(&self, category: UnitLineCategory) -> u16 {
        self.lines[category.logic_unit_id() as usize] & category.width_mask()
    }

    /// `lines[id] |= mask`, with `mask` truncated to the category's width.
    pub fn set(&mut self, category: UnitLineCategory, mask: u16) {
        let idx = category.logic_unit_id() as usize;
        self.lines[idx] |= mask & category.width_mask();
    }

    /// `lines[id] &= !mask`, with `mask` truncated to the category's width.
    pub fn reset(&mut self, category: UnitLineCategory, mask: u16) {
        let idx = category.logic_unit_id() as usize;
        self.lines[idx] &= !(mask & category.width_mask());
    }

    /// A snapshot of all nine registers, suitable for `PduUnitLineStates`.
    pub fn snapshot(&self) -> [(UnitLineCategory, u16); NUM_CATEGORIES] {
        let mut out = [(UnitLineCategory::HighPwHeaterEnSel, 0u16); NUM_CATEGORIES];
        for (i, category) in UnitLineCategory::ALL.into_iter().enumerate() {
            out[i] = (category, self.get(category));
        }
        out
    }
}

impl Default for LineRegisters {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_categories_start_at_zero() {
        let regs = LineRegisters::new();
        for category in UnitLineCategory::ALL {
            assert_eq!(regs.get(category), 0);
        }
    }

    #[test]
    fn set_then_query_round_trips_for_every_category_and_mask() {
        for category in UnitLineCategory::ALL {
            let full_mask: u16 = if category.width() >= 16 { 0xFFFF } else { (1u16 << category.width()) - 1 };
            for mask in [0x0001u16, 0x0003, full_mask] {
                let mut regs = LineRegisters::new();
                regs.set(category, mask);
                assert_eq!(regs.get(category), mask);
            }
        }
    }

    #[test]
    fn reset_clears_exactly_the_masked_bits() {
        let mut regs = LineRegisters::new();
        regs.set(UnitLineCategory::LowPwHeaterEnSel, 0x00FF);
        regs.reset(UnitLineCategory::LowPwHeaterEnSel, 0x000F);
        assert_eq!(regs.get(UnitLineCategory::LowPwHeaterEnSel), 0x00F0);
    }

    #[test]
    fn writes_above_category_width_are_truncated() {
        let mut regs = LineRegisters::new();
        regs.set(UnitLineCategory::ReactionWheelEnSel, 0xFFFF);
        assert_eq!(regs.get(UnitLineCategory::ReactionWheelEnSel), 0x000F);
    }

    #[test]
    fn set_is_idempotent_and_commutative_with_itself() {
        let mut a = LineRegisters::new();
        a.set(UnitLineCategory::PropEnSel, 0x0003);
        a.set(UnitLineCategory::PropEnSel, 0x0003);
        assert_eq!(a.get(UnitLineCategory::PropEnSel), 0x0003);

        let mut b = LineRegisters::new();
        b.set(UnitLineCategory::PropEnSel, 0x0001);
        b.set(UnitLineCategory::PropEnSel, 0x0002);
        let mut c = LineRegisters::new();
        c.set(UnitLineCategory::PropEnSel, 0x0002);
        c.set(UnitLineCategory::PropEnSel, 0x0001);
        assert_eq!(b.get(UnitLineCategory::PropEnSel), c.get(UnitLineCategory::PropEnSel));
    }

    #[test]
    fn set_then_reset_differs_from_reset_then_set_on_overlapping_masks() {
        let mut set_then_reset = LineRegisters::new();
        set_then_reset.set(UnitLineCategory::HdrmEnSel, 0x000F);
        set_then_reset.reset(UnitLineCategory::HdrmEnSel, 0x0003);

        let mut reset_then_set = LineRegisters::new();
        reset_then_set.reset(UnitLineCategory::HdrmEnSel, 0x0003);
        reset_then_set.set(UnitLineCategory::HdrmEnSel, 0x000F);

        assert_eq!(set_then_reset.get(UnitLineCategory::HdrmEnSel), 0x000C);
        assert_eq!(reset_then_set.get(UnitLineCategory::HdrmEnSel), 0x000F);
    }

    #[test]
    fn logic_unit_id_out_of_range_resolves_to_none() {
        assert!(UnitLineCategory::from_logic_unit_id(9).is_none());
        assert!(UnitLineCategory::from_logic_unit_id(255).is_none());
        assert!(UnitLineCategory::from_logic_unit_id(8).is_some());
    }

    #[test]
    fn snapshot_contains_all_nine_categories() {
        let regs = LineRegisters::new();
        let snapshot = regs.snapshot();
        assert_eq!(snapshot.len(), NUM_CATEGORIES);
        for category in UnitLineCategory::ALL {
            assert!(snapshot.iter().any(|(c, _)| *c == category));
        }
    }
}
