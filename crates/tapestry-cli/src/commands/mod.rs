//! Command implementations.

pub mod analyze;
pub mod config;
pub mod network;
pub mod organize;
pub mod pathways;
pub mod suggest;

pub use self::analyze::execute_analyze;
pub use self::config::execute_config;
pub use self::network::execute_network;
pub use self::organize::execute_organize;
pub use self::pathways::execute_pathways;
pub use self::suggest::execute_suggest;

use tapestry_domain::ItemId;

fn item_ids(ids: &[String]) -> Vec<ItemId> {
    ids.iter().map(|id| ItemId::new(id.as_str())).collect()
}
