pub mod color;
pub mod id;
pub mod resource;
pub mod state;
pub mod util;

use id::UniqueId;
