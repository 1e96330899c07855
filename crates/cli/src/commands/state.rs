//! Cart, favorites and auth commands.
//!
//! Each command opens the configured store, applies at most one action,
//! flushes and prints the affected slice.

use bozor_core::selectors::cart_totals;
use bozor_core::{Action, AuthSession, AuthToken, LineItem, Price, RootState, Slice, UserRecord};
use bozor_storefront::catalog::CatalogClient;
use bozor_storefront::config::StorefrontConfig;
use bozor_storefront::credentials::{
    LoginIdentifier, hash_password, validate_password, verify_password,
};
use bozor_storefront::storage::AnyStore;
use bozor_storefront::store::Store;
use bozor_storefront::{Error, Result};
use serde_json::json;

use super::Output;
use crate::{AuthAction, CartAction, FavoritesAction, ItemArgs, render};

impl ItemArgs {
    fn into_line_item(self) -> Result<LineItem> {
        let item = LineItem::new(self.id, self.name, Price::new(self.price)?);
        Ok(match self.image {
            Some(image) => item.with_image(image),
            None => item,
        })
    }
}

/// Open the store selected by configuration.
pub async fn open(config: &StorefrontConfig) -> Result<Store<AnyStore>> {
    let storage = AnyStore::connect(config).await?;
    tracing::debug!(backend = storage.backend_name(), "Storage connected");
    Ok(Store::open(storage, config.persist.clone()).await)
}

/// Apply `action` (if any), flush, and print `slice`.
async fn apply(
    config: &StorefrontConfig,
    output: Output,
    action: Option<Action>,
    slice: Slice,
) -> Result<()> {
    let mut store = open(config).await?;
    if let Some(action) = action {
        store.dispatch(action).await;
        store.flush().await;
        if store.failed_writes() > 0 {
            tracing::warn!(
                failed = store.failed_writes(),
                "Some changes could not be saved"
            );
        }
    }
    show(store.state(), output, slice)
}

fn show(state: &RootState, output: Output, slice: Slice) -> Result<()> {
    match slice {
        Slice::Cart => {
            let cart = state.cart();
            output.emit(
                &json!({ "items": cart.items(), "totals": cart_totals(cart) }),
                || render::cart(cart),
            )
        }
        Slice::Favorites => output.emit(state.favorites(), || render::favorites(state.favorites())),
        Slice::Auth => {
            let auth = state.auth();
            // Never print the token, even as JSON.
            output.emit(
                &json!({ "user": auth.user(), "isAuth": auth.is_auth() }),
                || render::auth(auth),
            )
        }
    }
}

pub async fn cart(config: &StorefrontConfig, output: Output, action: CartAction) -> Result<()> {
    let action = match action {
        CartAction::Show => None,
        CartAction::Add { item, quantity } => {
            Some(Action::add_to_cart(item.into_line_item()?, Some(quantity)))
        }
        CartAction::AddProduct { id, quantity } => {
            let product = CatalogClient::new(&config.catalog)?.product(id).await?;
            Some(Action::add_to_cart(product.to_line_item(), Some(quantity)))
        }
        CartAction::Remove { id } => Some(Action::RemoveFromCart(id)),
        CartAction::Set { id, quantity } => Some(Action::set_quantity(id, quantity)),
        CartAction::Clear => Some(Action::ClearCart),
    };
    apply(config, output, action, Slice::Cart).await
}

pub async fn favorites(
    config: &StorefrontConfig,
    output: Output,
    action: FavoritesAction,
) -> Result<()> {
    let action = match action {
        FavoritesAction::Show => None,
        FavoritesAction::Add { item } => Some(Action::AddToFavorites(item.into_line_item()?)),
        FavoritesAction::AddProduct { id } => {
            let product = CatalogClient::new(&config.catalog)?.product(id).await?;
            Some(Action::AddToFavorites(product.to_line_item()))
        }
        FavoritesAction::Remove { id } => Some(Action::RemoveFromFavorites(id)),
        FavoritesAction::Clear => Some(Action::ClearFavorites),
    };
    apply(config, output, action, Slice::Favorites).await
}

pub async fn auth(config: &StorefrontConfig, output: Output, action: AuthAction) -> Result<()> {
    let action = match action {
        AuthAction::Show => None,
        AuthAction::Login {
            identifier,
            token,
            user,
            register,
            password,
        } => {
            let identifier = LoginIdentifier::parse(&identifier)?;
            if register {
                validate_password(password.as_deref().unwrap_or_default())?;
            }
            let user = match user {
                Some(raw) => serde_json::from_str(&raw)?,
                None => json!({ "login": identifier.to_string() }),
            };
            let session = AuthSession {
                user: UserRecord::new(user),
                token: AuthToken::new(token),
            };
            Some(if register {
                Action::Register(session)
            } else {
                Action::Login(session)
            })
        }
        AuthAction::Logout => Some(Action::Logout),
        AuthAction::HashPassword { password } => {
            validate_password(&password)?;
            let hash = hash_password(&password)?;
            return output.emit(&json!({ "hash": &hash }), || hash.clone());
        }
        AuthAction::VerifyPassword { password, hash } => {
            verify_password(&password, &hash)?;
            return output.emit(&json!({ "valid": true }), || "Password matches.".to_string());
        }
    };
    apply(config, output, action, Slice::Auth).await
}

/// Apply a raw action given as JSON.
pub async fn dispatch(config: &StorefrontConfig, output: Output, raw: &str) -> Result<()> {
    let action: Action = serde_json::from_str(raw)
        .map_err(|e| Error::InvalidInput(format!("not a valid action: {e}")))?;
    let slice = action.slice();
    apply(config, output, Some(action), slice).await
}

/// Delete all persisted state in the namespace.
pub async fn reset(config: &StorefrontConfig) -> Result<()> {
    let mut store = open(config).await?;
    store.purge().await;
    if store.failed_writes() > 0 {
        tracing::warn!(failed = store.failed_writes(), "Some keys could not be removed");
    }
    tracing::info!(namespace = %config.persist.namespace, "State reset");
    Ok(())
}
