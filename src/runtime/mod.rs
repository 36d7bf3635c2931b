// 后台任务模块

mod sweeper;

pub use sweeper::{spawn_sweeper, SweeperHandle};
