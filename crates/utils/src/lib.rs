pub mod cid;
pub mod frame;
pub mod logs;
pub mod rng;
