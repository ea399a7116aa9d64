mod stage;
mod status_bar;

pub use stage::StageWidget;
pub use status_bar::StatusBarWidget;
