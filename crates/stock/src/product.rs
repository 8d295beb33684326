use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use estetica_core::{Aggregate, AggregateId, AggregateRoot, DomainError, Event, UserId};

use crate::movement::{MovementId, MovementType, StockMovement};

/// Product identifier (user-scoped via `user_id` fields in events/commands).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub AggregateId);

impl ProductId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Aggregate root: Product.
///
/// Stock is evolved exclusively through the append-only movement log
/// (`StockMovementRecorded` events); `current_stock` is the running fold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: ProductId,
    user_id: Option<UserId>,
    name: String,
    /// Selling/consumption unit, e.g. "ml", "un".
    unit: String,
    category: Option<String>,
    /// Acquisition cost per unit, in cents.
    cost_price: i64,
    current_stock: i64,
    min_stock: i64,
    expiry_date: Option<NaiveDate>,
    active: bool,
    version: u64,
    created: bool,
}

impl Product {
    /// Create an empty, not-yet-registered aggregate instance for rehydration.
    pub fn empty(id: ProductId) -> Self {
        Self {
            id,
            user_id: None,
            name: String::new(),
            unit: String::new(),
            category: None,
            cost_price: 0,
            current_stock: 0,
            min_stock: 0,
            expiry_date: None,
            active: false,
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn cost_price(&self) -> i64 {
        self.cost_price
    }

    pub fn current_stock(&self) -> i64 {
        self.current_stock
    }

    pub fn min_stock(&self) -> i64 {
        self.min_stock
    }

    pub fn expiry_date(&self) -> Option<NaiveDate> {
        self.expiry_date
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Stock at or below the configured minimum.
    pub fn is_low_stock(&self) -> bool {
        self.current_stock <= self.min_stock
    }

    /// Current stock valued at cost, in cents.
    pub fn stock_value(&self) -> i64 {
        self.current_stock * self.cost_price
    }
}

impl AggregateRoot for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: RegisterProduct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterProduct {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub name: String,
    pub unit: String,
    pub category: Option<String>,
    pub cost_price: i64,
    pub min_stock: i64,
    pub expiry_date: Option<NaiveDate>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RecordMovement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMovement {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub movement_id: MovementId,
    pub movement_type: MovementType,
    pub quantity: i64,
    pub unit_cost: Option<i64>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: DeactivateProduct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeactivateProduct {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductCommand {
    RegisterProduct(RegisterProduct),
    RecordMovement(RecordMovement),
    DeactivateProduct(DeactivateProduct),
}

/// Event: ProductRegistered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRegistered {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub name: String,
    pub unit: String,
    pub category: Option<String>,
    pub cost_price: i64,
    pub min_stock: i64,
    pub expiry_date: Option<NaiveDate>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: StockMovementRecorded.
///
/// Carries the immutable movement record; the sequence of these events is
/// the product's movement log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMovementRecorded {
    pub user_id: UserId,
    pub movement: StockMovement,
}

/// Event: ProductDeactivated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDeactivated {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductEvent {
    ProductRegistered(ProductRegistered),
    StockMovementRecorded(StockMovementRecorded),
    ProductDeactivated(ProductDeactivated),
}

impl Event for ProductEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ProductEvent::ProductRegistered(_) => "stock.product.registered",
            ProductEvent::StockMovementRecorded(_) => "stock.movement.recorded",
            ProductEvent::ProductDeactivated(_) => "stock.product.deactivated",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            ProductEvent::ProductRegistered(e) => e.occurred_at,
            ProductEvent::StockMovementRecorded(e) => e.movement.occurred_at,
            ProductEvent::ProductDeactivated(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Product {
    type Command = ProductCommand;
    type Event = ProductEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            ProductEvent::ProductRegistered(e) => {
                self.id = e.product_id;
                self.user_id = Some(e.user_id);
                self.name = e.name.clone();
                self.unit = e.unit.clone();
                self.category = e.category.clone();
                self.cost_price = e.cost_price;
                self.current_stock = 0;
                self.min_stock = e.min_stock;
                self.expiry_date = e.expiry_date;
                self.active = true;
                self.created = true;
            }
            ProductEvent::StockMovementRecorded(e) => {
                self.current_stock = match e.movement.movement_type {
                    MovementType::In => self.current_stock + e.movement.quantity,
                    MovementType::Out | MovementType::Expired | MovementType::Loss => {
                        // Stock never goes negative; over-consumption bottoms out at zero.
                        (self.current_stock - e.movement.quantity).max(0)
                    }
                    MovementType::Adjustment => e.movement.quantity,
                };
            }
            ProductEvent::ProductDeactivated(_) => {
                self.active = false;
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            ProductCommand::RegisterProduct(cmd) => self.handle_register(cmd),
            ProductCommand::RecordMovement(cmd) => self.handle_record(cmd),
            ProductCommand::DeactivateProduct(cmd) => self.handle_deactivate(cmd),
        }
    }
}

impl Product {
    fn ensure_user(&self, user_id: UserId) -> Result<(), DomainError> {
        if !self.created {
            return Ok(());
        }
        if self.user_id != Some(user_id) {
            return Err(DomainError::invariant("user mismatch"));
        }
        Ok(())
    }

    fn ensure_product_id(&self, product_id: ProductId) -> Result<(), DomainError> {
        if self.id != product_id {
            return Err(DomainError::invariant("product_id mismatch"));
        }
        Ok(())
    }

    fn handle_register(&self, cmd: &RegisterProduct) -> Result<Vec<ProductEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict("product already registered"));
        }
        if cmd.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if cmd.unit.trim().is_empty() {
            return Err(DomainError::validation("unit cannot be empty"));
        }
        if cmd.cost_price < 0 {
            return Err(DomainError::validation("cost_price cannot be negative"));
        }
        if cmd.min_stock < 0 {
            return Err(DomainError::validation("min_stock cannot be negative"));
        }
        Ok(vec![ProductEvent::ProductRegistered(ProductRegistered {
            user_id: cmd.user_id,
            product_id: cmd.product_id,
            name: cmd.name.clone(),
            unit: cmd.unit.clone(),
            category: cmd.category.clone(),
            cost_price: cmd.cost_price,
            min_stock: cmd.min_stock,
            expiry_date: cmd.expiry_date,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_record(&self, cmd: &RecordMovement) -> Result<Vec<ProductEvent>, DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        self.ensure_user(cmd.user_id)?;
        self.ensure_product_id(cmd.product_id)?;

        match cmd.movement_type {
            // Adjustments carry the absolute new level, which may be zero.
            MovementType::Adjustment => {
                if cmd.quantity < 0 {
                    return Err(DomainError::validation(
                        "adjustment quantity cannot be negative",
                    ));
                }
            }
            _ => {
                if cmd.quantity <= 0 {
                    return Err(DomainError::validation("quantity must be positive"));
                }
            }
        }
        if cmd.unit_cost.is_some_and(|cost| cost < 0) {
            return Err(DomainError::validation("unit_cost cannot be negative"));
        }

        Ok(vec![ProductEvent::StockMovementRecorded(StockMovementRecorded {
            user_id: cmd.user_id,
            movement: StockMovement {
                id: cmd.movement_id,
                product_id: cmd.product_id,
                movement_type: cmd.movement_type,
                quantity: cmd.quantity,
                unit_cost: cmd.unit_cost,
                occurred_at: cmd.occurred_at,
            },
        })])
    }

    fn handle_deactivate(&self, cmd: &DeactivateProduct) -> Result<Vec<ProductEvent>, DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        self.ensure_user(cmd.user_id)?;
        self.ensure_product_id(cmd.product_id)?;
        if !self.active {
            return Err(DomainError::conflict("product already deactivated"));
        }
        Ok(vec![ProductEvent::ProductDeactivated(ProductDeactivated {
            user_id: cmd.user_id,
            product_id: cmd.product_id,
            occurred_at: cmd.occurred_at,
        })])
    }
}
