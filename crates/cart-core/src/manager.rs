//! The cart manager: validated cart operations with persistence.

use std::fmt;

use cart_store::KeyValueStore;

use crate::cart::{Cart, CartSummary, LineItem};
use crate::catalog::CatalogService;
use crate::error::{CartError, CatalogError};
use crate::ids::ProductId;
use crate::money::Currency;
use crate::notify::{Notice, Notifier};
use crate::persistence::CartPersistence;

/// Mutating cart operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Remove,
    Update,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Add => write!(f, "add"),
            Operation::Remove => write!(f, "remove"),
            Operation::Update => write!(f, "update"),
        }
    }
}

/// Request to set a product's amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

impl UpdateProductAmount {
    pub fn new(product_id: impl Into<ProductId>, amount: i64) -> Self {
        Self {
            product_id: product_id.into(),
            amount,
        }
    }
}

/// Owner of the cart.
///
/// Every mutating operation validates against the catalog first and
/// builds the next snapshot on a copy; the current cart only changes when
/// the whole operation succeeds. Failures are reported to the notifier
/// and never returned to the caller. Each operation returns whether the
/// cart was committed.
///
/// Operations take `&mut self`, so a manager runs one operation at a time.
pub struct CartManager<C, S, N> {
    catalog: C,
    persistence: CartPersistence<S>,
    notifier: N,
    cart: Cart,
}

impl<C, S, N> CartManager<C, S, N>
where
    C: CatalogService,
    S: KeyValueStore,
    N: Notifier,
{
    /// Restore the cart stored under the default key.
    pub fn new(catalog: C, store: S, notifier: N) -> Self {
        Self::with_persistence(catalog, CartPersistence::new(store), notifier)
    }

    /// Restore the cart using the given persistence.
    pub fn with_persistence(catalog: C, mut persistence: CartPersistence<S>, notifier: N) -> Self {
        let cart = persistence.load();
        tracing::info!(key = %persistence.key(), items = cart.len(), "cart ready");
        Self {
            catalog,
            persistence,
            notifier,
            cart,
        }
    }

    /// Current cart snapshot.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Price the current cart.
    pub fn summary(&self, currency: Currency) -> Result<CartSummary, CartError> {
        CartSummary::from_cart(&self.cart, currency)
    }

    /// The catalog in use.
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Give the collaborators back.
    pub fn into_parts(self) -> (C, CartPersistence<S>, N) {
        (self.catalog, self.persistence, self.notifier)
    }

    /// Add one unit of a product.
    ///
    /// A product not yet in the cart is fetched from the catalog and
    /// appended with amount 1.
    pub async fn add_product(&mut self, product_id: ProductId) -> bool {
        let result = self.try_add(product_id).await;
        self.settle(Operation::Add, product_id, result)
    }

    /// Remove a product's line item.
    pub fn remove_product(&mut self, product_id: ProductId) -> bool {
        let result = self.try_remove(product_id);
        self.settle(Operation::Remove, product_id, result)
    }

    /// Set a product's amount.
    pub async fn update_product_amount(&mut self, request: UpdateProductAmount) -> bool {
        let result = self.try_update(request).await;
        self.settle(Operation::Update, request.product_id, result)
    }

    async fn try_add(&self, product_id: ProductId) -> Result<Cart, CartError> {
        let current = self.cart.amount_of(product_id);

        tracing::debug!(product_id = %product_id, "looking up stock");
        let stock = self.catalog.stock(product_id).await?;

        let requested = current.checked_add(1).ok_or(CartError::Overflow)?;
        if requested > stock.amount {
            return Err(CartError::StockExceeded {
                product_id,
                requested,
                available: stock.amount,
            });
        }

        let mut next = self.cart.clone();
        if current > 0 {
            next.set_amount(product_id, requested)?;
        } else {
            tracing::debug!(product_id = %product_id, "fetching product");
            let product = self.catalog.product(product_id).await?;
            if product.id != product_id {
                return Err(CatalogError::InvalidResponse(format!(
                    "asked for product {}, got {}",
                    product_id, product.id
                ))
                .into());
            }
            next.push(LineItem::new(product, 1))?;
        }
        Ok(next)
    }

    fn try_remove(&self, product_id: ProductId) -> Result<Cart, CartError> {
        let mut next = self.cart.clone();
        next.remove(product_id)?;
        Ok(next)
    }

    async fn try_update(&self, request: UpdateProductAmount) -> Result<Cart, CartError> {
        let UpdateProductAmount { product_id, amount } = request;
        if amount < 1 {
            return Err(CartError::InvalidAmount(amount));
        }

        tracing::debug!(product_id = %product_id, "looking up stock");
        let stock = self.catalog.stock(product_id).await?;
        if amount > stock.amount {
            return Err(CartError::StockExceeded {
                product_id,
                requested: amount,
                available: stock.amount,
            });
        }

        let mut next = self.cart.clone();
        next.set_amount(product_id, amount)?;
        Ok(next)
    }

    fn settle(
        &mut self,
        operation: Operation,
        product_id: ProductId,
        result: Result<Cart, CartError>,
    ) -> bool {
        match result {
            Ok(next) => {
                self.commit(next);
                tracing::info!(%operation, product_id = %product_id, "cart updated");
                true
            }
            Err(error) => {
                tracing::warn!(%operation, product_id = %product_id, %error, "cart operation failed");
                self.notifier.notify(Notice::for_failure(operation, &error));
                false
            }
        }
    }

    fn commit(&mut self, next: Cart) {
        self.cart = next;
        self.persistence.sync(&self.cart);
    }
}
