//! Email account command handlers.

mod connect_email_account;
mod disconnect_email_account;

pub use connect_email_account::{
    ConnectEmailAccountCommand, ConnectEmailAccountHandler, ConnectEmailAccountResult,
};
pub use disconnect_email_account::{
    DisconnectEmailAccountCommand, DisconnectEmailAccountHandler,
};
