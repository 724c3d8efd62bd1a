//! Terminal output.
//!
//! Command results go to stdout; notices and errors go to stderr.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use shopfront_core::{Branch, Order, Product, User};
use shopfront_storefront::cart::Cart;
use shopfront_storefront::wishlist::Wishlist;
use shopfront_storefront::{NoticeLevel, Page, StoreEvent};
use tokio::sync::broadcast;
use url::Url;

pub fn line(message: &str) {
    println!("{message}");
}

pub fn fatal(message: &str) {
    eprintln!("error: {message}");
}

pub fn url(url: &Url) {
    println!("{url}");
}

/// Print every notice received so far; invalidations are not shown.
pub fn notices(rx: &mut broadcast::Receiver<StoreEvent>) {
    for event in shopfront_storefront::notify::drain(rx) {
        if let StoreEvent::Notice(notice) = event {
            let tag = match notice.level {
                NoticeLevel::Success => "ok",
                NoticeLevel::Info => "info",
                NoticeLevel::Warning => "warning",
                NoticeLevel::Error => "error",
            };
            eprintln!("[{tag}] {}", notice.message);
        }
    }
}

pub fn cart(cart: &Cart) {
    if cart.is_empty() {
        println!("Your cart is empty.");
        return;
    }
    for item in cart.items() {
        println!(
            "{:<16} {:<32} {:>4} x {:>10} = {:>10}",
            item.product_id,
            item.display_name,
            item.quantity,
            item.unit_price,
            item.line_total()
        );
    }
    println!("{} items, total {}", cart.total_items(), cart.total_price());
}

pub fn wishlist(wishlist: &Wishlist) {
    if wishlist.is_empty() {
        println!("Your wishlist is empty.");
        return;
    }
    for item in wishlist.items() {
        println!(
            "{:<16} {:<32} {:>10}  saved {}",
            item.product_id,
            item.display_name,
            item.unit_price,
            item.added_at.format("%Y-%m-%d")
        );
    }
    println!("{} saved", wishlist.total_items());
}

pub fn products(page: &Page<Product>) {
    for product in &page.items {
        let stock = match product.stock {
            Some(0) => "sold out".to_string(),
            Some(n) => format!("{n} left"),
            None => String::new(),
        };
        println!(
            "{:<16} {:<32} {:<12} {:>10}  {}",
            product.id, product.name, product.category, product.price, stock
        );
    }
    println!(
        "page {} of {} ({} products)",
        page.meta.page,
        page.meta.total_pages.max(1),
        page.meta.total
    );
}

pub fn order(order: &Order) {
    println!(
        "Order {} [{}] placed {}",
        order.id,
        order.status,
        order.created_at.format("%Y-%m-%d %H:%M")
    );
    for line in &order.items {
        println!(
            "  {:<16} {:<32} {:>4} x {:>10}",
            line.product_id, line.name, line.quantity, line.unit_price
        );
    }
    println!("  total {}", order.total_price);
}

pub fn orders(page: &Page<Order>) {
    for order in &page.items {
        println!(
            "{:<16} {:<10} {:>10}  {}",
            order.id,
            order.status,
            order.total_price,
            order.created_at.format("%Y-%m-%d")
        );
    }
    println!("page {} of {}", page.meta.page, page.meta.total_pages.max(1));
}

pub fn users(page: &Page<User>) {
    for user in &page.items {
        println!("{:<16} {:<24} {:<32} {}", user.id, user.name, user.email, user.role);
    }
    println!("page {} of {}", page.meta.page, page.meta.total_pages.max(1));
}

pub fn branches(branches: &[Branch]) {
    for branch in branches {
        println!(
            "{:<16} {:<24} {}, {}",
            branch.id, branch.name, branch.address, branch.city
        );
    }
}
