//! Declarative route table
//!
//! Each role owns one group: a URL prefix, a layout and the pages beneath
//! it. Resolution is first-match over groups in declaration order.

use std::collections::BTreeMap;
use std::fmt;

use crate::auth::{Role, AUTH_PATH};

/// Hard navigation target after logout; redirects on to the auth screen
pub const LOGIN_PATH: &str = "/login";

/// Layout shell wrapping a group's pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Admin,
    Vendor,
    Customer,
}

impl Layout {
    /// Heading shown above every page of the layout
    pub fn heading(&self) -> &'static str {
        match self {
            Layout::Admin => "Admin Panel",
            Layout::Vendor => "Vendor Panel",
            Layout::Customer => "Customer Panel",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::Admin => write!(f, "AdminLayout"),
            Layout::Vendor => write!(f, "VendorLayout"),
            Layout::Customer => write!(f, "CustomerLayout"),
        }
    }
}

/// What a page loads from the backend when it mounts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// Form-only or placeholder page
    None,
    /// `GET` of an endpoint template; `:name` segments are filled from
    /// the route parameters
    Get(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRoute {
    /// Pattern relative to the group prefix, e.g. `orders/:id`
    pub pattern: &'static str,
    pub title: &'static str,
    pub source: DataSource,
}

impl PageRoute {
    pub const fn new(pattern: &'static str, title: &'static str, source: DataSource) -> Self {
        Self {
            pattern,
            title,
            source,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGroup {
    /// Leading segment(s) shared by the group; empty for the root group
    pub prefix: &'static str,
    pub layout: Layout,
    pub required_role: Role,
    pub pages: Vec<PageRoute>,
}

impl RouteGroup {
    /// Absolute path pattern of one of the group's pages
    pub fn full_path(&self, page: &PageRoute) -> String {
        if self.prefix.is_empty() {
            format!("/{}", page.pattern)
        } else {
            format!("/{}/{}", self.prefix, page.pattern)
        }
    }
}

/// Result of matching a path against the table
#[derive(Debug, Clone, PartialEq)]
pub enum RouteMatch<'a> {
    /// The public login/register screen
    AuthScreen,
    Redirect(&'static str),
    Page {
        group: &'a RouteGroup,
        page: &'a PageRoute,
        params: BTreeMap<String, String>,
    },
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    groups: Vec<RouteGroup>,
}

impl RouteTable {
    pub fn new(groups: Vec<RouteGroup>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[RouteGroup] {
        &self.groups
    }

    pub fn group_for(&self, role: Role) -> Option<&RouteGroup> {
        self.groups.iter().find(|g| g.required_role == role)
    }

    /// Match a path. Query strings and trailing slashes are ignored.
    pub fn resolve(&self, path: &str) -> RouteMatch<'_> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            ["auth"] => return RouteMatch::AuthScreen,
            [] | ["login"] => return RouteMatch::Redirect(AUTH_PATH),
            _ => {}
        }

        for group in &self.groups {
            let prefix: Vec<&str> = group.prefix.split('/').filter(|s| !s.is_empty()).collect();
            let Some(rest) = segments.strip_prefix(prefix.as_slice()) else {
                continue;
            };

            for page in &group.pages {
                if let Some(params) = match_pattern(page.pattern, rest) {
                    return RouteMatch::Page {
                        group,
                        page,
                        params,
                    };
                }
            }
        }

        RouteMatch::Redirect(AUTH_PATH)
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        standard_routes()
    }
}

fn match_pattern(pattern: &str, segments: &[&str]) -> Option<BTreeMap<String, String>> {
    let parts: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    if parts.len() != segments.len() {
        return None;
    }

    let mut params = BTreeMap::new();
    for (part, segment) in parts.iter().zip(segments) {
        match part.strip_prefix(':') {
            Some(name) => {
                params.insert(name.to_string(), (*segment).to_string());
            }
            None if part == segment => {}
            None => return None,
        }
    }
    Some(params)
}

/// The three role subtrees of the console
pub fn standard_routes() -> RouteTable {
    use DataSource::{Get, None as Static};

    let admin = RouteGroup {
        prefix: "",
        layout: Layout::Admin,
        required_role: Role::Superadmin,
        pages: vec![
            PageRoute::new("dashboard", "Dashboard", Get("/dashboard")),
            PageRoute::new("pos", "New Sale", Static),
            PageRoute::new("users", "Users", Get("/auth/all-users")),
            PageRoute::new("orders", "Orders", Get("/order")),
            PageRoute::new("order", "Orders", Get("/order")),
            PageRoute::new("refunds", "Order Refunds", Get("/refunds")),
            PageRoute::new("flash-sales", "Flash Sales", Get("/flashsales")),
            PageRoute::new("campaigns", "Campaigns", Static),
            PageRoute::new("banners", "Banners", Get("/banners")),
            PageRoute::new("coupons", "Coupons", Get("/coupons")),
            PageRoute::new("categories", "Categories", Get("/categories")),
            PageRoute::new("attributes", "Attributes", Get("/attributes")),
            PageRoute::new("products", "Product Setup", Get("/product")),
            PageRoute::new("stores", "Stores List", Get("/stores")),
            PageRoute::new("stores/new", "New Stores", Static),
            PageRoute::new("vendor-list", "Vendor List", Get("/auth/all-users?role=vendor")),
            PageRoute::new(
                "vendor-list/:vendorId/dashboard",
                "Vendor Dashboard",
                Get("/auth/user/:vendorId"),
            ),
            PageRoute::new("customer-list", "Customer List", Get("/auth/all-users?role=customer")),
            PageRoute::new(
                "customer-list/:customerId/dashboard",
                "Customer Dashboard",
                Get("/auth/user/:customerId"),
            ),
            PageRoute::new("vendor-dashboard/:vendorId", "Vendor Dashboard", Get("/vendors/:vendorId")),
            PageRoute::new(
                "customer-dashboard/:customerId",
                "Customer Dashboard",
                Get("/auth/user/:customerId"),
            ),
        ],
    };

    let vendor = RouteGroup {
        prefix: "vendor",
        layout: Layout::Vendor,
        required_role: Role::Vendor,
        pages: vec![
            PageRoute::new("dashboard", "Dashboard", Get("/vendor/profile")),
            PageRoute::new("items", "Items", Get("/vendor/products")),
            PageRoute::new("orders", "Orders", Get("/vendor/orders")),
            PageRoute::new("order", "Orders", Get("/vendor/orders")),
            PageRoute::new("refund", "Order Refunds", Get("/refunds")),
            PageRoute::new("pos", "New Sale", Static),
            PageRoute::new("order-refunds", "Order Refunds", Get("/refunds")),
            PageRoute::new("flash-sales", "Flash Sales", Get("/vendor/flashsales")),
            PageRoute::new("campaigns", "Campaigns", Static),
            PageRoute::new("coupons", "Coupons", Get("/coupons")),
            PageRoute::new("banners", "Banners", Get("/vendor/banners")),
            PageRoute::new("notifications", "Push Notification", Get("/pushNotifications")),
            PageRoute::new("categories", "Categories", Get("/categories")),
            PageRoute::new("attributes", "Attributes", Get("/attributes")),
            PageRoute::new("product-setup", "Product Setup", Get("/vendor/products")),
            PageRoute::new("new-stores", "New Stores", Static),
            PageRoute::new("add-stores", "Add Stores", Static),
            PageRoute::new("stores-list", "Stores List", Get("/vendor/stores")),
            PageRoute::new("bulk-import", "Bulk Import", Static),
            PageRoute::new("bulk-export", "Bulk Export", Get("/vendor/products")),
            PageRoute::new("config", "Store Config", Get("/vendor/profile")),
            PageRoute::new("shop", "My Shop", Get("/vendor/profile")),
            PageRoute::new("reviews", "Reviews", Static),
            PageRoute::new("chat", "Chat", Static),
            PageRoute::new("customer-list", "Customer List", Get("/auth/all-users?role=customer")),
        ],
    };

    let customer = RouteGroup {
        prefix: "customer",
        layout: Layout::Customer,
        required_role: Role::Customer,
        pages: vec![
            PageRoute::new("dashboard", "Dashboard", Get("/customer/orders")),
            PageRoute::new("products", "Browse Products", Get("/product")),
            PageRoute::new("cart", "Cart", Get("/cart")),
            PageRoute::new("orders", "My Orders", Get("/customer/orders")),
            PageRoute::new("order", "My Orders", Get("/customer/orders")),
            PageRoute::new("wishlist", "Wishlist", Static),
            PageRoute::new("addresses", "My Addresses", Static),
            PageRoute::new("profile", "Profile", Get("/auth/user/:userId")),
            PageRoute::new("orders/:id", "Order Details", Get("/customer/orders/:id")),
        ],
    };

    RouteTable::new(vec![admin, vendor, customer])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_of(m: RouteMatch<'_>) -> (Role, &'static str, BTreeMap<String, String>) {
        match m {
            RouteMatch::Page {
                group,
                page,
                params,
            } => (group.required_role, page.pattern, params),
            other => panic!("expected a page, got {:?}", other),
        }
    }

    #[test]
    fn test_public_and_fallback_routes() {
        let table = standard_routes();
        assert_eq!(table.resolve("/auth"), RouteMatch::AuthScreen);
        assert_eq!(table.resolve("/login"), RouteMatch::Redirect(AUTH_PATH));
        assert_eq!(table.resolve("/"), RouteMatch::Redirect(AUTH_PATH));
        assert_eq!(table.resolve("/no/such/page"), RouteMatch::Redirect(AUTH_PATH));
    }

    #[test]
    fn test_each_role_has_a_dashboard() {
        let table = standard_routes();
        for role in Role::ALL {
            let (matched, pattern, _) = page_of(table.resolve(role.home()));
            assert_eq!(matched, role);
            assert_eq!(pattern, "dashboard");
        }
    }

    #[test]
    fn test_parameters_are_captured() {
        let table = standard_routes();

        let (role, pattern, params) = page_of(table.resolve("/customer/orders/o-42/"));
        assert_eq!(role, Role::Customer);
        assert_eq!(pattern, "orders/:id");
        assert_eq!(params.get("id").map(String::as_str), Some("o-42"));

        let (role, _, params) = page_of(table.resolve("/vendor-list/v7/dashboard?tab=sales"));
        assert_eq!(role, Role::Superadmin);
        assert_eq!(params.get("vendorId").map(String::as_str), Some("v7"));
    }

    #[test]
    fn test_prefix_must_match_whole_segment() {
        let table = standard_routes();
        let (role, pattern, _) = page_of(table.resolve("/vendor-list"));
        assert_eq!(role, Role::Superadmin);
        assert_eq!(pattern, "vendor-list");

        let (role, _, _) = page_of(table.resolve("/vendor/customer-list"));
        assert_eq!(role, Role::Vendor);
    }

    #[test]
    fn test_full_path() {
        let table = standard_routes();
        let vendor = table.group_for(Role::Vendor).unwrap();
        assert_eq!(vendor.full_path(&vendor.pages[0]), "/vendor/dashboard");

        let admin = table.group_for(Role::Superadmin).unwrap();
        assert_eq!(admin.full_path(&admin.pages[0]), "/dashboard");
    }
}
