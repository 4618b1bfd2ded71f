//! Protection monitor: derives the `ProtectionStatus` bitfield and `PduMode`
//! from the current line registers and PDU state. Pure function of its inputs.

use crate::lines::{LineRegisters, UnitLineCategory};
use crate::state::{PduMode, PduState};

/// Bit 0: at least one category has more than half its lines energised at once.
const BIT_MANY_LINES_ON: u32 = 1 << 0;
/// Bit 1: PDU is in `Maintenance`, where live line changes are non-nominal.
const BIT_MAINTENANCE_ADVISORY: u32 = 1 << 1;

/// Bits that would force `PduMode::Fault` if ever set. This build defines no
/// critical condition, so the mask is empty and `Fault` is reachable only by a
/// future ICD revision wiring a bit into it.
const CRITICAL_MASK: u32 = 0;

/// Computes `ProtectionStatus` and `PduMode` from the line registers and state.
pub fn evaluate(registers: &LineRegisters, state: PduState) -> (u32, PduMode) {
    let mut status = 0u32;

    for category in UnitLineCategory::ALL {
        let energised = registers.get(category).count_ones();
        if energised as u32 * 2 > category.width() as u32 {
            status |= BIT_MANY_LINES_ON;
        }
    }

    if state == PduState::Maintenance {
        status |= BIT_MAINTENANCE_ADVISORY;
    }

    let mode = if status & CRITICAL_MASK != 0 {
        PduMode::Fault
    } else if status != 0 {
        PduMode::Degraded
    } else {
        PduMode::Nominal
    };

    (status, mode)
}
