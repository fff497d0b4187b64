mod task;

pub use self::task::{ResultSender, Task};
