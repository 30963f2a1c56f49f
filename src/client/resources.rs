//! CRUD collections exposed by the backend

use clap::ValueEnum;
use std::fmt;

use crate::auth::Role;

/// A collection supporting list/get/create/update/delete under one path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Resource {
    Products,
    Orders,
    Customers,
    Vendors,
    Banners,
    Coupons,
    Refunds,
    Categories,
    Attributes,
    Stores,
    FlashSales,
    PushNotifications,
    VendorFlashSales,
    VendorStores,
}

impl Resource {
    pub const ALL: [Resource; 14] = [
        Resource::Products,
        Resource::Orders,
        Resource::Customers,
        Resource::Vendors,
        Resource::Banners,
        Resource::Coupons,
        Resource::Refunds,
        Resource::Categories,
        Resource::Attributes,
        Resource::Stores,
        Resource::FlashSales,
        Resource::PushNotifications,
        Resource::VendorFlashSales,
        Resource::VendorStores,
    ];

    /// Collection path below the API base URL
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Products => "/product",
            Resource::Orders => "/order",
            Resource::Customers => "/customers",
            Resource::Vendors => "/vendors",
            Resource::Banners => "/banners",
            Resource::Coupons => "/coupons",
            Resource::Refunds => "/refunds",
            Resource::Categories => "/categories",
            Resource::Attributes => "/attributes",
            Resource::Stores => "/stores",
            Resource::FlashSales => "/flashsales",
            Resource::PushNotifications => "/pushNotifications",
            Resource::VendorFlashSales => "/vendor/flashsales",
            Resource::VendorStores => "/vendor/stores",
        }
    }

    /// Collection path split into URL segments
    pub fn segments(&self) -> Vec<&'static str> {
        self.path().split('/').filter(|s| !s.is_empty()).collect()
    }

    /// Role the console requires before touching the collection.
    /// `None` means any signed-in role; the backend has the final word.
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Resource::Customers | Resource::Vendors | Resource::Stores | Resource::FlashSales => {
                Some(Role::Superadmin)
            }
            Resource::PushNotifications | Resource::VendorFlashSales | Resource::VendorStores => {
                Some(Role::Vendor)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path().trim_start_matches('/'))
    }
}
