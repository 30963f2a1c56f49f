//! CLI interface for Storedesk

pub mod commands;
mod output;

pub use output::*;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::auth::Role;
use crate::client::Resource;

#[derive(Parser)]
#[command(name = "storedesk")]
#[command(author = "Krakaw")]
#[command(version)]
#[command(about = "Role-gated console for a multi-vendor e-commerce backend", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Path to storedesk.toml (searched upward from the current directory by default)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend API base URL
    #[arg(long, env = "STOREDESK_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Session file location
    #[arg(long, env = "STOREDESK_SESSION", global = true)]
    pub session_file: Option<PathBuf>,

    /// Require the bearer token's role to agree with the stored role
    #[arg(long, global = true)]
    pub strict: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new storedesk.toml configuration file
    Init,

    /// Log in and store the session
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Password (prompted when omitted)
        #[arg(short, long, env = "STOREDESK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Create a new account
    Register {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        /// Account role
        #[arg(short, long, default_value = "customer")]
        role: Role,

        #[arg(long)]
        phone: Option<String>,

        /// Store name (vendors)
        #[arg(long)]
        store_name: Option<String>,

        /// GST number (vendors)
        #[arg(long)]
        gst_number: Option<String>,

        /// Password (prompted when omitted)
        #[arg(short, long, env = "STOREDESK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Clear the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Open a console page by path, e.g. /vendor/orders
    Open {
        path: String,

        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// List the pages of the console
    Routes {
        /// Only pages of this role
        #[arg(short, long)]
        role: Option<Role>,
    },

    /// Overview panels for the signed-in role
    Dashboard,

    /// List a collection
    List {
        resource: Resource,

        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show one record
    Get {
        resource: Resource,
        id: String,

        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Create a record from JSON (inline or @file)
    Create {
        resource: Resource,

        #[arg(short, long)]
        data: String,
    },

    /// Update a record from JSON (inline or @file)
    Update {
        resource: Resource,
        id: String,

        #[arg(short, long)]
        data: String,
    },

    /// Delete a record
    Delete {
        resource: Resource,
        id: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// List accounts of one role (superadmin)
    Users {
        #[arg(short, long)]
        role: Role,

        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Order operations
    Order {
        #[command(subcommand)]
        action: OrderAction,
    },

    /// Refund decisions
    Refund {
        #[command(subcommand)]
        action: RefundAction,
    },

    /// Shopping cart (customer)
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },

    /// Vendor shop profile
    Shop {
        #[command(subcommand)]
        action: ShopAction,
    },

    /// Follow session changes made by other storedesk processes
    Watch,
}

#[derive(Subcommand)]
pub enum OrderAction {
    /// Set an order's status
    Status { id: String, status: String },

    /// Orders of the signed-in customer
    Mine {
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// One order of the signed-in customer
    Show {
        id: String,

        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },
}

#[derive(Subcommand)]
pub enum RefundAction {
    /// Approve a refund request
    Approve { id: String },

    /// Reject a refund request
    Reject {
        id: String,

        #[arg(short, long, default_value = "")]
        reason: String,
    },
}

#[derive(Subcommand)]
pub enum CartAction {
    /// Show the cart
    Show {
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Add a product
    Add {
        product_id: String,

        #[arg(short, long, default_value = "1")]
        quantity: u32,
    },

    /// Change an item's quantity
    Update { item_id: String, quantity: u32 },

    /// Remove an item
    Remove { item_id: String },

    /// Empty the cart
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum ShopAction {
    /// Show the vendor profile
    Show {
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Update the vendor profile from JSON (inline or @file)
    Update {
        #[arg(short, long)]
        data: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}
