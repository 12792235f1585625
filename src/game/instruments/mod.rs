// Head-up display: compass, vario slider, variometer and status line

pub mod compass;
pub mod data_slider;
pub mod text_message;
pub mod variometer;

pub use compass::Compass;
pub use data_slider::DataSlider;
pub use text_message::TextMessage;
pub use variometer::Variometer;
