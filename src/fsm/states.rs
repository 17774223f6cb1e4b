//! Concrete state handler functions and table builder.
//!
//! Each mode is defined by plain `fn` pointers: no closures, no dynamic
//! dispatch, no heap.
//!
//! ```text
//!  NORMAL ──[estop command]──▶ OPERATOR_STOP
//!    │                              │
//!    │                      [probe fault]
//!    │                              ▼
//!    └───────[probe fault]──▶ FAULT_STOP   (terminal)
//! ```
//!
//! A probe fault in the same cycle as an estop wins: the more severe mode
//! is entered directly.

use super::context::ControllerContext;
use super::{SafetyMode, StateDescriptor};
use crate::control::{heater_intent, mean_celsius};
use log::{error, info, warn};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; SafetyMode::COUNT] {
    [
        // Index 0: Normal
        StateDescriptor {
            id: SafetyMode::Normal,
            name: "Normal",
            on_enter: Some(normal_enter),
            on_exit: None,
            on_update: normal_update,
        },
        // Index 1: OperatorStop
        StateDescriptor {
            id: SafetyMode::OperatorStop,
            name: "OperatorStop",
            on_enter: Some(operator_stop_enter),
            on_exit: None,
            on_update: operator_stop_update,
        },
        // Index 2: FaultStop
        StateDescriptor {
            id: SafetyMode::FaultStop,
            name: "FaultStop",
            on_enter: Some(fault_stop_enter),
            on_exit: None,
            on_update: fault_stop_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  NORMAL: bang-bang control through the debounce filter
// ═══════════════════════════════════════════════════════════════════════════

fn normal_enter(ctx: &mut ControllerContext) {
    info!(
        "NORMAL: control enabled, setpoint {:.2}\u{00b0}C, debounce {} cycles",
        ctx.setpoint_c, ctx.config.debounce_cycles
    );
}

fn normal_update(ctx: &mut ControllerContext) -> Option<SafetyMode> {
    // Guard: unsafe probe set → FaultStop
    if ctx.fault.is_some() {
        return Some(SafetyMode::FaultStop);
    }

    if ctx.estop_requested {
        return Some(SafetyMode::OperatorStop);
    }

    // The supervisor already faults an empty mean; this is the backstop.
    let Some(mean) = mean_celsius(&ctx.readings) else {
        warn!("NORMAL: no usable readings for the mean");
        return Some(SafetyMode::FaultStop);
    };

    ctx.heater_intent = heater_intent(mean, ctx.setpoint_c);
    ctx.heater_command = ctx.debounce.filter(ctx.heater_intent, ctx.heater_actual);
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  OPERATOR_STOP: latched by an emergency-stop command
// ═══════════════════════════════════════════════════════════════════════════

fn operator_stop_enter(ctx: &mut ControllerContext) {
    ctx.setpoint_c = 0.0;
    ctx.estop_requested = false;
    ctx.command_off();
    warn!("OPERATOR_STOP: emergency stop latched, heater off");
}

fn operator_stop_update(ctx: &mut ControllerContext) -> Option<SafetyMode> {
    ctx.command_off();
    if ctx.fault.is_some() {
        return Some(SafetyMode::FaultStop);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  FAULT_STOP: latched by an invalid probe set; never left
// ═══════════════════════════════════════════════════════════════════════════

fn fault_stop_enter(ctx: &mut ControllerContext) {
    ctx.setpoint_c = 0.0;
    ctx.estop_requested = false;
    ctx.command_off();
    match ctx.fault {
        Some(fault) => error!("FAULT_STOP: {fault}, heater off until power cycle"),
        None => error!("FAULT_STOP: heater off until power cycle"),
    }
}

fn fault_stop_update(ctx: &mut ControllerContext) -> Option<SafetyMode> {
    ctx.command_off();
    ctx.estop_requested = false;
    None
}
