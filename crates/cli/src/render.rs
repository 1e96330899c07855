//! Plain-text views of state and catalog data.

use bozor_core::selectors::{cart_totals, line_total, monthly_installment};
use bozor_core::{AuthState, CartState, FavoritesState};
use bozor_storefront::catalog::{Category, Listing, Product};
use rust_decimal::Decimal;

const NAME_WIDTH: usize = 32;

pub fn cart(cart: &CartState) -> String {
    if cart.is_empty() {
        return "Cart is empty.".to_string();
    }

    let totals = cart_totals(cart);
    let mut lines = vec![format!(
        "Cart ({} {}, {} {})",
        totals.line_count,
        plural(totals.line_count as u64, "line", "lines"),
        totals.item_count,
        plural(totals.item_count, "item", "items"),
    )];
    lines.extend(cart.items().iter().map(|line| {
        format!(
            "  #{:<6}{:<width$}{} x {} = {:.2}",
            line.id(),
            truncate(&line.item.name),
            line.quantity,
            line.item.price,
            line_total(line),
            width = NAME_WIDTH + 2,
        )
    }));
    lines.push(format!("Subtotal: {:.2}", totals.subtotal));
    lines.join("\n")
}

pub fn favorites(favorites: &FavoritesState) -> String {
    if favorites.is_empty() {
        return "No favorites yet.".to_string();
    }

    let mut lines = vec![format!("Favorites ({})", favorites.len())];
    lines.extend(favorites.items().iter().map(|item| {
        format!(
            "  #{:<6}{:<width$}{}",
            item.id,
            truncate(&item.name),
            item.price,
            width = NAME_WIDTH + 2,
        )
    }));
    lines.join("\n")
}

/// Session summary. The token itself is never shown.
pub fn auth(auth: &AuthState) -> String {
    if !auth.is_auth() {
        return "Signed out.".to_string();
    }
    let who = auth
        .user()
        .and_then(|user| {
            ["name", "email", "phone", "login"]
                .iter()
                .find_map(|field| user.as_json().get(*field).and_then(|v| v.as_str()))
        })
        .unwrap_or("unknown user");
    format!("Signed in as {who}.")
}

pub fn listing(listing: &Listing, page: u32) -> String {
    if listing.products.is_empty() {
        return "No products found.".to_string();
    }

    let mut lines = vec![format!(
        "Showing {} of {} products",
        listing.products.len(),
        listing.total
    )];
    lines.extend(listing.products.iter().map(product_row));
    if listing.has_more {
        lines.push(format!("More: --page {}", page.saturating_add(1)));
    }
    lines.join("\n")
}

fn product_row(product: &Product) -> String {
    let mut row = format!(
        "  #{:<6}{:<width$}{:>10}",
        product.id,
        truncate(&product.title),
        product.price,
        width = NAME_WIDTH + 2,
    );
    if product.discount_percentage > Decimal::ZERO {
        row.push_str(&format!(
            "  -{}%  now {}",
            product.discount_percentage.normalize(),
            product.discounted_price()
        ));
    }
    row
}

/// Product detail with installment and the shopper's own relation to it.
pub fn product(product: &Product, months: u32, in_cart: Option<u32>, favorite: bool) -> String {
    let sale = product.discounted_price();
    let mut lines = vec![format!("#{} {}", product.id, product.title)];

    let mut facts = vec![format!("Category: {}", product.category)];
    if let Some(brand) = &product.brand {
        facts.push(format!("Brand: {brand}"));
    }
    if let Some(rating) = product.rating {
        facts.push(format!("Rating: {rating:.1}"));
    }
    lines.push(facts.join("   "));

    if product.discount_percentage > Decimal::ZERO {
        lines.push(format!(
            "Price: {} (-{}%) now {}",
            product.price,
            product.discount_percentage.normalize(),
            sale
        ));
    } else {
        lines.push(format!("Price: {sale}"));
    }
    lines.push(format!(
        "Installment: {} / month for {} months",
        monthly_installment(sale.amount(), months),
        months.max(1)
    ));
    if !product.description.is_empty() {
        lines.push(product.description.clone());
    }
    if let Some(image) = product.primary_image() {
        lines.push(format!("Image: {image}"));
    }
    lines.push(format!(
        "In cart: {}   Favorite: {}",
        in_cart.unwrap_or(0),
        if favorite { "yes" } else { "no" }
    ));
    lines.join("\n")
}

pub fn categories(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories.".to_string();
    }
    categories
        .iter()
        .map(|c| format!("  {:<24}{}", c.slug, c.name))
        .collect::<Vec<_>>()
        .join("\n")
}

const fn plural<'a>(n: u64, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 { one } else { many }
}

fn truncate(name: &str) -> String {
    if name.chars().count() <= NAME_WIDTH {
        return name.to_string();
    }
    let mut short: String = name.chars().take(NAME_WIDTH - 1).collect();
    short.push('…');
    short
}
