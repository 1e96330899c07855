//! Catalog browsing commands.
//!
//! Listings fail closed: if the catalog cannot be reached the command prints
//! an empty result and logs a warning. Looking up a single product is an
//! error instead, since there is nothing sensible to show.

use bozor_core::selectors::is_favorite;
use bozor_storefront::Result;
use bozor_storefront::catalog::{CatalogClient, Listing, Refinement, fail_closed};
use bozor_storefront::config::StorefrontConfig;

use super::Output;
use super::state::open;
use crate::{CatalogAction, RefineArgs, render};

impl From<RefineArgs> for Refinement {
    fn from(args: RefineArgs) -> Self {
        Self {
            min_price: args.min_price,
            max_price: args.max_price,
            sort: args.sort,
        }
    }
}

pub async fn run(config: &StorefrontConfig, output: Output, action: CatalogAction) -> Result<()> {
    let client = CatalogClient::new(&config.catalog)?;

    match action {
        CatalogAction::List {
            category,
            page,
            refine,
        } => {
            let page_size = client.page_size();
            let result = match category.as_deref() {
                Some(slug) => client.list_category(slug, page, page_size).await,
                None => client.list(page, page_size).await,
            };
            let listing =
                Listing::from_page(fail_closed(result, "listing"), page_size, &refine.into());
            output.emit(&listing, || render::listing(&listing, page))
        }
        CatalogAction::Search { query, refine } => {
            let found = fail_closed(client.search(&query).await, "search");
            // Search results come back in one page.
            let listing = Listing::from_page(found, 0, &refine.into());
            output.emit(&listing, || render::listing(&listing, 0))
        }
        CatalogAction::Show { id, months } => {
            let product = client.product(id).await?;
            let store = open(config).await?;
            let state = store.state();
            let in_cart = state.cart().get(id).map(|line| line.quantity.get());
            let favorite = is_favorite(state.favorites(), id);
            output.emit(&product, || {
                render::product(&product, months, in_cart, favorite)
            })
        }
        CatalogAction::Categories => {
            let categories = fail_closed(client.categories().await, "categories");
            output.emit(&categories, || render::categories(&categories))
        }
    }
}
