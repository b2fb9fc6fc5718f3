//! Terminal rendering for command results.
//!
//! `*_table` and `*_detail` functions build strings so they can be tested;
//! [`print`] writes them to stdout.

use std::fmt::Write as _;

use tabled::{Table, Tabled};

use gaspass_core::cart::CartState;
use gaspass_core::catalog::{BlogPost, Category, Health, Product, Review, Stats};
use gaspass_core::checkout::{ChannelOutcome, CheckoutReceipt};

/// Print a rendered block to stdout.
#[allow(clippy::print_stdout)]
pub fn print(text: &str) {
    println!("{text}");
}

#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "ID")]
    id: i32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Stock")]
    stock: i32,
    #[tabled(rename = "Rating")]
    rating: String,
}

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    id: i32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
}

#[derive(Tabled)]
struct ReviewRow {
    #[tabled(rename = "ID")]
    id: i32,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Rating")]
    rating: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Product")]
    product: String,
}

#[derive(Tabled)]
struct BlogPostRow {
    #[tabled(rename = "ID")]
    id: i32,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Tags")]
    tags: String,
}

#[derive(Tabled)]
struct CartRow {
    #[tabled(rename = "ID")]
    id: i32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Qty")]
    quantity: u32,
    #[tabled(rename = "Stock")]
    stock: u32,
    #[tabled(rename = "Total")]
    total: String,
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

pub fn products_table(products: &[Product]) -> String {
    if products.is_empty() {
        return "No products found.".to_string();
    }
    Table::new(products.iter().map(|p| ProductRow {
        id: p.id.as_i32(),
        name: p.name.clone(),
        category: p.category_label(),
        price: p.price.to_string(),
        stock: p.stock,
        rating: or_dash(p.rating),
    }))
    .to_string()
}

pub fn product_detail(product: &Product) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} (#{})", product.name, product.id);
    let _ = writeln!(out, "  Category: {}", product.category_label());
    let _ = writeln!(out, "  Price:    {}", product.price);
    let _ = writeln!(out, "  Rating:   {}", or_dash(product.rating));
    if product.in_stock() {
        let _ = writeln!(out, "  Stock:    {}", product.stock);
    } else {
        let _ = writeln!(out, "  Stock:    out of stock");
    }
    if product.featured == Some(true) {
        let _ = writeln!(out, "  Featured");
    }
    let _ = write!(out, "\n{}", product.description);
    out
}

pub fn categories_table(categories: &[Category]) -> String {
    Table::new(categories.iter().map(|c| CategoryRow {
        id: c.id.as_i32(),
        name: c.name.clone(),
        description: c.description.clone().unwrap_or_default(),
    }))
    .to_string()
}

pub fn reviews_table(reviews: &[Review]) -> String {
    if reviews.is_empty() {
        return "No reviews yet.".to_string();
    }
    Table::new(reviews.iter().map(|r| ReviewRow {
        id: r.id.as_i32(),
        author: r.author.clone(),
        rating: format!("{}/5", r.rating),
        date: r.date.clone(),
        product: r
            .product_name
            .clone()
            .unwrap_or_else(|| or_dash(r.product_id)),
    }))
    .to_string()
}

pub fn review_detail(review: &Review) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} - {}/5 ({})", review.author, review.rating, review.date);
    if let Some(product) = &review.product_name {
        let _ = writeln!(out, "  On: {product}");
    }
    let _ = write!(out, "\n{}", review.text);
    out
}

pub fn blog_posts_table(posts: &[BlogPost]) -> String {
    Table::new(posts.iter().map(|p| BlogPostRow {
        id: p.id.as_i32(),
        title: p.title.clone(),
        author: p.author.clone(),
        date: p.date.clone(),
        tags: p.tags.join(", "),
    }))
    .to_string()
}

pub fn blog_post_detail(post: &BlogPost) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", post.title);
    let _ = writeln!(out, "  By {} on {}", post.author, post.date);
    if let Some(category) = &post.category {
        let _ = writeln!(out, "  Category: {category}");
    }
    if let Some(minutes) = post.reading_time {
        let _ = writeln!(out, "  Reading time: {minutes} min");
    }
    if !post.tags.is_empty() {
        let _ = writeln!(out, "  Tags: {}", post.tags.join(", "));
    }
    let _ = write!(out, "\n{}", post.content);
    out
}

pub fn stats_detail(stats: &Stats) -> String {
    format!(
        "Products:   {}\nCategories: {}\nReviews:    {}",
        stats.products, stats.categories, stats.reviews
    )
}

pub fn health_detail(health: &Health) -> String {
    format!(
        "Status:      {}\nDatabase:    {}\nServer time: {}\nEnvironment: {}",
        health.status, health.database, health.server_time, health.environment
    )
}

pub fn cart_table(cart: &CartState, currency: &str) -> String {
    if cart.is_empty() {
        return "Your cart is empty.".to_string();
    }
    let table = Table::new(cart.items.iter().map(|item| CartRow {
        id: item.product_id.as_i32(),
        name: item.name.clone(),
        price: item.price.to_string(),
        quantity: item.quantity,
        stock: item.stock,
        total: item.line_total().to_string(),
    }));
    format!(
        "{table}\n{} item(s), total {} {currency}",
        cart.total_items(),
        cart.total_price()
    )
}

pub fn receipt_detail(receipt: &CheckoutReceipt) -> String {
    let mut out = String::new();
    for report in &receipt.reports {
        match &report.outcome {
            ChannelOutcome::Delivered => {
                let _ = writeln!(out, "  ✓ {}", report.channel);
            }
            ChannelOutcome::Failed { reason } => {
                let _ = writeln!(out, "  ✗ {}: {reason}", report.channel);
            }
        }
    }
    let verdict = if receipt.success {
        "Order sent"
    } else {
        "Order NOT sent"
    };
    let _ = write!(out, "{verdict}: {}", receipt.message);
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use gaspass_core::cart::CartLineItem;
    use gaspass_core::checkout::ChannelReport;
    use gaspass_core::{CategoryId, Price, ProductId};

    use super::*;

    fn product(stock: i32) -> Product {
        Product {
            id: ProductId::new(7),
            name: "Casque".to_string(),
            price: Price::from(45_000),
            description: "Sans fil".to_string(),
            image: "casque.png".to_string(),
            category: CategoryId::new(2),
            rating: None,
            stock,
            featured: None,
            category_name: Some("Audio".to_string()),
        }
    }

    #[test]
    fn test_products_table() {
        let table = products_table(&[product(4)]);
        assert!(table.contains("Casque"));
        assert!(table.contains("Audio"));
        assert!(table.contains("45000"));
        assert_eq!(products_table(&[]), "No products found.");
    }

    #[test]
    fn test_product_detail_out_of_stock() {
        assert!(product_detail(&product(0)).contains("out of stock"));
        assert!(product_detail(&product(3)).contains("Stock:    3"));
    }

    #[test]
    fn test_cart_table_totals() {
        let cart = CartState {
            items: vec![CartLineItem::from_product(&product(5), 2)],
        };
        let table = cart_table(&cart, "FCFA");
        assert!(table.ends_with("2 item(s), total 90000 FCFA"));
        assert_eq!(cart_table(&CartState::default(), "FCFA"), "Your cart is empty.");
    }

    #[test]
    fn test_receipt_detail() {
        let receipt = CheckoutReceipt::from_reports(vec![
            ChannelReport::delivered("Telegram"),
            ChannelReport::failed("EmailJS", "HTTP 400: bad template"),
        ]);
        let text = receipt_detail(&receipt);
        assert!(text.contains("✓ Telegram"));
        assert!(text.contains("✗ EmailJS: HTTP 400: bad template"));
        assert!(text.starts_with("  ✓"));
        assert!(text.contains("Order sent: delivered via Telegram"));
    }
}
