pub mod app;
pub mod event;
pub mod input;
pub mod pointer;
pub mod projection;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use theme::GruvboxMaterial;
