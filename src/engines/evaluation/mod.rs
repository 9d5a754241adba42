pub mod backtester;

pub use backtester::BacktestCalibrator;
