pub mod chart;
pub mod layout;
pub mod orderbook;
pub mod statusbar;
pub mod target;

pub use chart::PriceChart;
pub use layout::LiveView;
pub use orderbook::{DepthState, OrderBookPanel};
pub use statusbar::StatusBar;
pub use target::{RenderTarget, TerminalSize, TerminalTarget};
