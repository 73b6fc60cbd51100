// Actor模块 - 使用Actor模式管理并发状态
//
// 用Actor模式替代Arc<Mutex<T>>，通过消息传递实现并发控制
// 每个Actor按到达顺序逐条处理命令，修改之间不会交错

pub mod list_store;
pub mod llm_manager;

pub use list_store::{ListStoreActor, ListStoreCommand, ListStoreHandle};
pub use llm_manager::{LLMCommand, LLMHandle, LLMManagerActor};
