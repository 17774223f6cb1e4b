//! Function-pointer finite state machine for the safety mode.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  StateTable                                                  │
//! │  ┌──────────────┬───────────┬──────────┬───────────────────┐ │
//! │  │ SafetyMode   │ on_enter  │ on_exit  │ on_update         │ │
//! │  ├──────────────┼───────────┼──────────┼───────────────────┤ │
//! │  │ Normal       │ fn(ctx)   │ -        │ fn(ctx)->Option<> │ │
//! │  │ OperatorStop │ fn(ctx)   │ -        │ fn(ctx)->Option<> │ │
//! │  │ FaultStop    │ fn(ctx)   │ -        │ fn(ctx)->Option<> │ │
//! │  └──────────────┴───────────┴──────────┴───────────────────┘ │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine calls `on_update` for the **current** mode, which
//! decides this cycle's heater command. If it returns `Some(next)`, the
//! engine runs `on_exit` for the current mode, then `on_enter` for the
//! next. Transitions only ever move to a more severe mode: stop modes are
//! terminal for the rest of the power cycle.

pub mod context;
pub mod states;

use context::ControllerContext;
use log::{info, warn};

// ---------------------------------------------------------------------------
// Mode identity
// ---------------------------------------------------------------------------

/// Operating / safety mode. Ordered by severity; the discriminant is the
/// code reported on the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum SafetyMode {
    /// Control permitted.
    Normal = 0,
    /// Latched by an emergency-stop command.
    OperatorStop = 1,
    /// Latched by an invalid probe set.
    FaultStop = 2,
}

impl SafetyMode {
    /// Total number of modes, used to size the table array.
    pub const COUNT: usize = 3;

    /// Convert an index back to `SafetyMode`. Asserts in debug builds;
    /// returns `FaultStop` in release (safe fallback).
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Normal,
            1 => Self::OperatorStop,
            2 => Self::FaultStop,
            _ => {
                debug_assert!(false, "invalid mode index: {idx}");
                Self::FaultStop
            }
        }
    }

    /// Status-line code (0=Normal, 1=OperatorStop, 2=FaultStop).
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// True for either stop mode.
    pub fn is_stopped(self) -> bool {
        self != Self::Normal
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
pub type StateActionFn = fn(&mut ControllerContext);

/// Signature for the per-tick update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateUpdateFn = fn(&mut ControllerContext) -> Option<SafetyMode>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single mode.
pub struct StateDescriptor {
    pub id: SafetyMode,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
pub struct Fsm {
    /// Fixed-size table indexed by `SafetyMode as usize`.
    table: [StateDescriptor; SafetyMode::COUNT],
    /// Index of the currently active mode.
    current: usize,
}

impl Fsm {
    /// Construct a new FSM with the given table, starting in `initial`.
    pub fn new(table: [StateDescriptor; SafetyMode::COUNT], initial: SafetyMode) -> Self {
        Self {
            table,
            current: initial as usize,
        }
    }

    /// Run the initial `on_enter` for the starting mode.
    /// Call once after construction, before the first `tick()`.
    pub fn start(&mut self, ctx: &mut ControllerContext) {
        info!("FSM starting in mode: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance the FSM by one control cycle.
    ///
    /// 1. Call `on_update` for the current mode.
    /// 2. If it returns a more severe mode, execute the transition:
    ///    `on_exit(current)` → update pointer → `on_enter(next)`.
    pub fn tick(&mut self, ctx: &mut ControllerContext) {
        let next = (self.table[self.current].on_update)(ctx);

        if let Some(next_id) = next {
            self.escalate(next_id, ctx);
        }
    }

    /// Move to `next` if it is more severe than the current mode.
    /// Returns `true` if a transition happened.
    pub fn escalate(&mut self, next: SafetyMode, ctx: &mut ControllerContext) -> bool {
        if next <= self.current_state() {
            if next < self.current_state() {
                warn!(
                    "FSM refused de-escalation {} -> {}",
                    self.table[self.current].name, self.table[next as usize].name
                );
            }
            return false;
        }
        self.transition(next, ctx);
        true
    }

    /// The current mode.
    pub fn current_state(&self) -> SafetyMode {
        SafetyMode::from_index(self.current)
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: SafetyMode, ctx: &mut ControllerContext) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
