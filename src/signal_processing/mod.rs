pub mod dc_removal;
pub mod delay_line;
pub mod filter;
pub mod fir;
pub mod moving_average;
pub mod nlms;

pub use dc_removal::DcRemover;
pub use delay_line::DelayLine;
pub use filter::Filter;
pub use fir::{BufferStrategy, FirFilter};
pub use moving_average::MovingAverage;
pub use nlms::NlmsCanceller;
