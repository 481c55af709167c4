use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Identifies a trace source format / subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraceType {
    WindowManager,
    SurfaceFlinger,
    ScreenRecording,
    Transactions,
    TransactionsLegacy,
    ProtoLog,
    InputMethodClients,
    InputMethodManagerService,
    InputMethodService,
    EventLog,
    WmTransition,
    ShellTransition,
    Transition,
    ViewCapture,
}

/// Producer/consumer order between UI subsystems: an input event flows
/// through the input method stack, the log, the window manager and
/// transactions before reaching the compositor and the screen.
/// Types not listed have no defined pipeline position.
const UI_PIPELINE_ORDER: &[TraceType] = &[
    TraceType::InputMethodClients,
    TraceType::InputMethodService,
    TraceType::InputMethodManagerService,
    TraceType::ProtoLog,
    TraceType::WindowManager,
    TraceType::Transactions,
    TraceType::SurfaceFlinger,
    TraceType::ScreenRecording,
];

/// Panel stacking order for laying out multiple traces together.
const DISPLAY_ORDER: &[TraceType] = &[
    TraceType::ScreenRecording,
    TraceType::SurfaceFlinger,
    TraceType::WindowManager,
    TraceType::InputMethodClients,
    TraceType::InputMethodManagerService,
    TraceType::InputMethodService,
    TraceType::Transactions,
    TraceType::TransactionsLegacy,
    TraceType::ProtoLog,
    TraceType::EventLog,
    TraceType::WmTransition,
    TraceType::ShellTransition,
    TraceType::Transition,
    TraceType::ViewCapture,
];

const TRACES_WITH_VIEWERS: &[TraceType] = &[
    TraceType::ScreenRecording,
    TraceType::SurfaceFlinger,
    TraceType::WindowManager,
    TraceType::InputMethodClients,
    TraceType::InputMethodManagerService,
    TraceType::InputMethodService,
    TraceType::Transactions,
    TraceType::TransactionsLegacy,
    TraceType::ProtoLog,
    TraceType::Transition,
    TraceType::ViewCapture,
];

fn index_in(order: &[TraceType], t: TraceType) -> Option<usize> {
    order.iter().position(|&candidate| candidate == t)
}

/// Whether a dedicated viewer exists for this trace type.
pub fn has_viewer(t: TraceType) -> bool {
    TRACES_WITH_VIEWERS.contains(&t)
}

/// True iff both types have a pipeline position and `a` produces for
/// `b` (appears strictly earlier in the pipeline).
pub fn precedes_in_ui_pipeline(a: TraceType, b: TraceType) -> bool {
    match (index_in(UI_PIPELINE_ORDER, a), index_in(UI_PIPELINE_ORDER, b)) {
        (Some(ia), Some(ib)) => ia < ib,
        _ => false,
    }
}

/// Panel stacking comparison over all trace types.
pub fn compare_by_display_order(a: TraceType, b: TraceType) -> Ordering {
    // Every variant is listed in DISPLAY_ORDER; an unlisted type would
    // be a table maintenance bug, sorted last rather than panicking.
    let ia = index_in(DISPLAY_ORDER, a).unwrap_or(usize::MAX);
    let ib = index_in(DISPLAY_ORDER, b).unwrap_or(usize::MAX);
    ia.cmp(&ib)
}
