// Storefront collaborators
pub mod customers;
pub mod sales_channels;
pub mod settings;

// Mollie Components
pub mod assets;
pub mod locale;
pub mod mollie;
pub mod routing;
