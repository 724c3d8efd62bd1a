//! `shopfront checkout ...`

use clap::Args;
use shopfront_core::ShippingDetails;
use shopfront_storefront::StorefrontSession;

use super::CliError;
use crate::output;

/// Shipping details for the order.
#[derive(Debug, Args)]
pub struct ShippingArgs {
    /// Recipient's full name
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub phone: String,
    /// Street address
    #[arg(long)]
    pub address: String,
    #[arg(long)]
    pub city: String,
    #[arg(long)]
    pub postal_code: String,
    /// Delivery notes
    #[arg(long)]
    pub notes: Option<String>,
}

impl From<ShippingArgs> for ShippingDetails {
    fn from(args: ShippingArgs) -> Self {
        Self {
            full_name: args.name,
            email: args.email,
            phone: args.phone,
            address: args.address,
            city: args.city,
            postal_code: args.postal_code,
            notes: args.notes,
        }
    }
}

/// Submit the cart. The cart is kept if anything fails.
pub async fn run(session: &mut StorefrontSession, args: ShippingArgs) -> Result<(), CliError> {
    let order = session.checkout(args.into()).await?;
    output::order(&order);
    Ok(())
}
