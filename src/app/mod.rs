pub mod batch;
pub mod codecs;
