//! CLI command implementations

use anyhow::{anyhow, bail, Result};
use futures_util::future::{join_all, BoxFuture, FutureExt};
use serde_json::Value;
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;

use crate::auth::{
    inspect_token, AuthGate, GateDecision, LoginRequest, RegisterRequest, Role, AUTH_PATH,
};
use crate::cli::{
    confirm, error, info, print_record_table, print_routes, print_session, print_value,
    prompt_password, spinner, success, warn, CartAction, GlobalArgs, OrderAction, OutputFormat,
    RefundAction, ShopAction,
};
use crate::client::{ApiClient, ApiResponse, Resource};
use crate::config::{self, Config};
use crate::router::{standard_routes, Navigation, Navigator, Page, RouteMatch, LOGIN_PATH};
use crate::session::{FileStorage, Session, SessionContext, SessionEvent};

/// Everything a command needs, wired from config and global flags
pub struct Console {
    pub config: Config,
    pub session: Arc<SessionContext>,
    pub api: ApiClient,
    pub gate: AuthGate,
    pub navigator: Navigator,
}

impl Console {
    pub fn open(global: &GlobalArgs) -> Result<Self> {
        let mut config = load_config(global)?;
        if let Some(url) = &global.api_url {
            config.api.base_url = url.clone();
        }
        if let Some(path) = &global.session_file {
            config.session.path = path.clone();
        }
        if global.strict {
            config.auth.strict = true;
        }
        Self::from_config(config)
    }

    pub fn from_config(config: Config) -> Result<Self> {
        let storage = Arc::new(FileStorage::new(config.session.path.clone()));
        let session = Arc::new(SessionContext::new(storage.clone()));
        let api = ApiClient::new(config.api.base_url.clone(), Arc::clone(&session))?;
        let gate = AuthGate::new(storage, config.gate_mode());
        let navigator = Navigator::new(standard_routes(), gate.clone());

        Ok(Self {
            config,
            session,
            api,
            gate,
            navigator,
        })
    }

    /// Run the gate for a command; on denial print where the user is sent
    pub fn require(&self, role: Option<Role>) -> Result<Session> {
        match self.gate.check(role) {
            GateDecision::Granted(session) => Ok(session),
            GateDecision::Denied(reason) => {
                error(&format!("Access denied: {}", reason));
                info(&format!(
                    "Redirecting to {}. Log in with 'storedesk login --email <email>'",
                    AUTH_PATH
                ));
                Err(crate::Error::Session(reason).into())
            }
        }
    }
}

/// Initialize a new storedesk.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = std::path::Path::new(config::loader::CONFIG_FILENAME);

    if config_path.exists() {
        warn("storedesk.toml already exists");
        return Ok(());
    }

    fs::write(config_path, config::loader::default_config_content())?;

    success("Created storedesk.toml");
    info("Edit the configuration file and run 'storedesk login --email <email>' to sign in");

    Ok(())
}

/// Log in and persist the session
pub async fn login(global: &GlobalArgs, email: &str, password: Option<String>) -> Result<()> {
    let console = Console::open(global)?;
    let password = match password {
        Some(password) => password,
        None => prompt_password()?,
    };

    let pb = spinner(&format!("Signing in as {}", email));
    let response = console
        .api
        .login(&LoginRequest {
            email: email.to_string(),
            password,
        })
        .await;
    pb.finish_and_clear();

    let response = match response {
        Ok(response) => response,
        Err(e) => {
            error(&format!("Login failed: {}", e));
            return Err(e.into());
        }
    };

    match console.session.login(response) {
        Ok(session) => {
            success("Login successful!");
            let home = session.role.home();
            match console.navigator.navigate(home) {
                Navigation::Render(page) => {
                    info(&format!("{} › {} ({})", page.layout.heading(), page.title, home))
                }
                other => warn(&format!("Landing page unavailable: {:?}", other)),
            }
            Ok(())
        }
        Err(e) => {
            error(&format!("Login failed: {}", e));
            Err(e.into())
        }
    }
}

/// Register a new account
pub async fn register(global: &GlobalArgs, mut account: RegisterRequest) -> Result<()> {
    let console = Console::open(global)?;
    if account.password.is_empty() {
        account.password = prompt_password()?;
    }

    match console.api.register(&account).await {
        Ok(_) => {
            success("Registration successful! Please login.");
            Ok(())
        }
        Err(e) => {
            error(&format!("Registration failed: {}", e));
            Err(e.into())
        }
    }
}

/// Clear the session and follow the redirect to the login screen
pub async fn logout(global: &GlobalArgs) -> Result<()> {
    let console = Console::open(global)?;

    let navigation = console.session.logout()?;
    success("Logged out");

    if let Navigation::Redirect(to) = navigation {
        if console.navigator.settle(&to) == Navigation::AuthScreen {
            info(&format!("Redirected {} → {}", to, AUTH_PATH));
        }
    }
    Ok(())
}

/// Show the signed-in user
pub async fn whoami(global: &GlobalArgs) -> Result<()> {
    let console = Console::open(global)?;

    let Some(session) = console.session.current() else {
        warn("Not logged in");
        return Ok(());
    };

    let profile = console.session.profile(session.role);
    let claims = inspect_token(&session.token).ok();
    print_session(&session, &profile, claims.as_ref());
    Ok(())
}

/// Navigate to a page and render what it loads
pub async fn open(global: &GlobalArgs, path: &str, format: OutputFormat) -> Result<()> {
    let console = Console::open(global)?;

    let protected = matches!(console.navigator.table().resolve(path), RouteMatch::Page { .. });

    match console.navigator.settle(path) {
        Navigation::Render(page) => render_page(&console, &page, format).await,
        _ if protected => {
            error(&format!("{} is not available, redirected to {}", path, AUTH_PATH));
            bail!("access to {} denied", path)
        }
        _ => {
            info("Login / Register");
            info("Sign in with 'storedesk login --email <email>' or create an account with 'storedesk register'");
            Ok(())
        }
    }
}

async fn render_page(console: &Console, page: &Page, format: OutputFormat) -> Result<()> {
    let profile = console.session.profile(page.session.role);
    info(&format!(
        "{} › {}   [{}] {}",
        page.layout.heading(),
        page.title,
        profile.initial,
        profile.email
    ));

    let Some(endpoint) = page.endpoint() else {
        info("Nothing to load on this page");
        return Ok(());
    };

    let pb = spinner("Loading...");
    let result = console.api.get::<Value>(&endpoint).await;
    pb.finish_and_clear();

    match result {
        Ok(value) => print_value(&value, format),
        Err(e) => {
            fail(&format!("Failed to load {}: {}", page.title, e), &e);
            Err(e.into())
        }
    }
}

/// Print the route table
pub async fn routes(role: Option<Role>) -> Result<()> {
    print_routes(&standard_routes(), role);
    Ok(())
}

/// Fetch the role's overview panels concurrently; each panel fails on its own
pub async fn dashboard(global: &GlobalArgs) -> Result<()> {
    let console = Console::open(global)?;
    let session = console.require(None)?;
    let api = &console.api;

    let as_list = |r: crate::Result<Vec<Value>>| r.map(Value::Array);
    let panels: Vec<(&str, BoxFuture<'_, crate::Result<Value>>)> = match session.role {
        Role::Superadmin => vec![
            ("Overview", api.dashboard().boxed()),
            ("Orders", api.list(Resource::Orders).map(as_list).boxed()),
            ("Refunds", api.list(Resource::Refunds).map(as_list).boxed()),
            ("Vendors", api.users_by_role(Role::Vendor).map(as_list).boxed()),
            ("Customers", api.users_by_role(Role::Customer).map(as_list).boxed()),
        ],
        Role::Vendor => vec![
            ("Shop", api.vendor_profile().boxed()),
            ("Orders", api.vendor_orders().map(as_list).boxed()),
            ("Products", api.vendor_products().map(as_list).boxed()),
            ("Banners", api.vendor_banners().map(as_list).boxed()),
        ],
        Role::Customer => vec![
            ("My Orders", api.customer_orders().map(as_list).boxed()),
            ("Cart", api.cart().boxed()),
        ],
    };

    let (titles, requests): (Vec<_>, Vec<_>) = panels.into_iter().unzip();
    let pb = spinner("Loading dashboard...");
    let results = join_all(requests).await;
    pb.finish_and_clear();

    let mut failures = 0;
    for (title, result) in titles.into_iter().zip(results) {
        println!();
        info(title);
        match result {
            Ok(Value::Array(records)) => {
                let shown: Vec<Value> = records.iter().take(5).cloned().collect();
                print_record_table(&shown);
                if records.len() > shown.len() {
                    info(&format!("showing {} of {}", shown.len(), records.len()));
                }
            }
            Ok(value) => print_value(&value, OutputFormat::Table)?,
            Err(e) => {
                failures += 1;
                warn(&format!("{} unavailable: {}", title, e));
            }
        }
    }

    if failures > 0 {
        warn(&format!("{} panel(s) failed to load", failures));
    }
    Ok(())
}

/// List a collection
pub async fn list(global: &GlobalArgs, resource: Resource, format: OutputFormat) -> Result<()> {
    let console = Console::open(global)?;
    console.require(resource.required_role())?;

    let pb = spinner(&format!("Fetching {}", resource));
    let result = console.api.list(resource).await;
    pb.finish_and_clear();

    match result {
        Ok(records) => print_value(&Value::Array(records), format),
        Err(e) => {
            fail(&format!("Error fetching {}: {}", resource, e), &e);
            Err(e.into())
        }
    }
}

/// Show one record
pub async fn get(
    global: &GlobalArgs,
    resource: Resource,
    id: &str,
    format: OutputFormat,
) -> Result<()> {
    let console = Console::open(global)?;
    console.require(resource.required_role())?;

    match console.api.fetch(resource, id).await {
        Ok(record) => print_value(&record, format),
        Err(e) => {
            fail(&format!("Failed to fetch {} {}: {}", resource, id, e), &e);
            Err(e.into())
        }
    }
}

/// Create a record
pub async fn create(global: &GlobalArgs, resource: Resource, data: &str) -> Result<()> {
    let console = Console::open(global)?;
    console.require(resource.required_role())?;
    let record = parse_data(data)?;

    report(
        console.api.create(resource, &record).await,
        &format!("Created {}", resource),
        &format!("Failed to create {}", resource),
    )
}

/// Update a record
pub async fn update(global: &GlobalArgs, resource: Resource, id: &str, data: &str) -> Result<()> {
    let console = Console::open(global)?;
    console.require(resource.required_role())?;
    let record = parse_data(data)?;

    report(
        console.api.update(resource, id, &record).await,
        &format!("Updated {} {}", resource, id),
        &format!("Failed to update {} {}", resource, id),
    )
}

/// Delete a record
pub async fn delete(global: &GlobalArgs, resource: Resource, id: &str, force: bool) -> Result<()> {
    let console = Console::open(global)?;
    console.require(resource.required_role())?;

    if !force && !confirm(&format!("Are you sure you want to delete {} '{}'?", resource, id)) {
        info("Cancelled");
        return Ok(());
    }

    report(
        console.api.delete(resource, id).await,
        &format!("Deleted {} {}", resource, id),
        &format!("Failed to delete {} {}", resource, id),
    )
}

/// List accounts of one role
pub async fn users(global: &GlobalArgs, role: Role, format: OutputFormat) -> Result<()> {
    let console = Console::open(global)?;
    console.require(Some(Role::Superadmin))?;

    match console.api.users_by_role(role).await {
        Ok(users) => print_value(&Value::Array(users), format),
        Err(e) => {
            fail(&format!("Failed to fetch {} accounts: {}", role, e), &e);
            Err(e.into())
        }
    }
}

/// Order commands
pub async fn order(global: &GlobalArgs, action: OrderAction) -> Result<()> {
    let console = Console::open(global)?;

    match action {
        OrderAction::Status { id, status } => {
            console.require(None)?;
            report(
                console.api.update_order_status(&id, &status).await,
                &format!("Order {} is now {}", id, status),
                &format!("Failed to update order {}", id),
            )
        }
        OrderAction::Mine { format } => {
            console.require(Some(Role::Customer))?;
            let orders = console.api.customer_orders().await.map_err(|e| {
                fail(&format!("Error fetching orders: {}", e), &e);
                e
            })?;
            print_value(&Value::Array(orders), format)
        }
        OrderAction::Show { id, format } => {
            console.require(Some(Role::Customer))?;
            let order = console.api.customer_order(&id).await.map_err(|e| {
                fail(&format!("Failed to fetch order {}: {}", id, e), &e);
                e
            })?;
            print_value(&order, format)
        }
    }
}

/// Refund decisions
pub async fn refund(global: &GlobalArgs, action: RefundAction) -> Result<()> {
    let console = Console::open(global)?;
    console.require(None)?;

    match action {
        RefundAction::Approve { id } => report(
            console.api.approve_refund(&id).await,
            &format!("Refund {} approved", id),
            &format!("Failed to approve refund {}", id),
        ),
        RefundAction::Reject { id, reason } => report(
            console.api.reject_refund(&id, &reason).await,
            &format!("Refund {} rejected", id),
            &format!("Failed to reject refund {}", id),
        ),
    }
}

/// Cart commands
pub async fn cart(global: &GlobalArgs, action: CartAction) -> Result<()> {
    let console = Console::open(global)?;
    console.require(Some(Role::Customer))?;

    match action {
        CartAction::Show { format } => {
            let cart = console.api.cart().await.map_err(|e| {
                fail(&format!("Error fetching cart: {}", e), &e);
                e
            })?;
            print_value(&cart, format)
        }
        CartAction::Add {
            product_id,
            quantity,
        } => report(
            console.api.add_to_cart(&product_id, quantity).await,
            &format!("Added {} × {} to cart", quantity, product_id),
            "Failed to add to cart",
        ),
        CartAction::Update { item_id, quantity } => report(
            console.api.update_cart_item(&item_id, quantity).await,
            &format!("Set {} to {}", item_id, quantity),
            "Failed to update cart item",
        ),
        CartAction::Remove { item_id } => report(
            console.api.remove_from_cart(&item_id).await,
            &format!("Removed {} from cart", item_id),
            "Failed to remove cart item",
        ),
        CartAction::Clear { force } => {
            if !force && !confirm("Empty the cart?") {
                info("Cancelled");
                return Ok(());
            }
            report(console.api.clear_cart().await, "Cart cleared", "Failed to clear cart")
        }
    }
}

/// Vendor shop profile
pub async fn shop(global: &GlobalArgs, action: ShopAction) -> Result<()> {
    let console = Console::open(global)?;
    console.require(Some(Role::Vendor))?;

    match action {
        ShopAction::Show { format } => {
            let profile = console.api.vendor_profile().await.map_err(|e| {
                fail(&format!("Error fetching shop profile: {}", e), &e);
                e
            })?;
            print_value(&profile, format)
        }
        ShopAction::Update { data } => {
            let profile = parse_data(&data)?;
            report(
                console.api.update_vendor_profile(&profile).await,
                "Shop profile updated",
                "Failed to update shop profile",
            )
        }
    }
}

/// Print session changes made elsewhere until interrupted
pub async fn watch(global: &GlobalArgs) -> Result<()> {
    let console = Console::open(global)?;
    let mut events = console.session.subscribe();
    let interval = Duration::from_millis(console.config.session.watch_interval_ms.max(50));
    let watcher = console.session.spawn_watcher(interval);

    match console.session.current() {
        Some(session) => info(&format!("Watching session of {} ({})", session.user_id, session.role)),
        None => info("Watching session (not logged in)"),
    }

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.recv() => match event {
                Ok(SessionEvent::Changed(Some(session))) | Ok(SessionEvent::LoggedIn(session)) => {
                    success(&format!("Signed in as {} ({})", session.user_id, session.role));
                }
                Ok(SessionEvent::Changed(None)) | Ok(SessionEvent::LoggedOut) => {
                    warn(&format!("Signed out, redirecting to {}", AUTH_PATH));
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!("Skipped {} session events", skipped);
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    watcher.abort();
    Ok(())
}

// Helper functions

fn load_config(global: &GlobalArgs) -> Result<Config> {
    match &global.config {
        Some(path) => config::load_config_from_path(path),
        None => config::load_config_or_default(),
    }
    .map_err(|e| anyhow!("{}", e))
}

/// Inline JSON, or `@path` to read it from a file
fn parse_data(data: &str) -> Result<Value> {
    let text = match data.strip_prefix('@') {
        Some(path) => fs::read_to_string(path)?,
        None => data.to_string(),
    };
    serde_json::from_str(&text).map_err(|e| anyhow!("Invalid JSON data: {}", e))
}

/// Print a failed backend call. A rejected token has already cleared the
/// session, so point the user back at the login screen.
fn fail(message: &str, e: &crate::Error) {
    error(message);
    if e.requires_login() {
        info(&format!("Session expired, redirecting to {}", LOGIN_PATH));
    }
}

fn report(result: crate::Result<ApiResponse<Value>>, done: &str, failed: &str) -> Result<()> {
    match result {
        Ok(response) => {
            match response.message {
                Some(message) => success(&format!("{}: {}", done, message)),
                None => success(done),
            }
            Ok(())
        }
        Err(e) => {
            fail(&format!("{}: {}", failed, e), &e);
            Err(e.into())
        }
    }
}
