use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString,
)]
pub enum Role {
    Admin,
    #[default]
    User,
}
