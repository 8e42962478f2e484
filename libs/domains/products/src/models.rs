use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Product entity as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Store-assigned identifier, rendered as a 24-character hex string
    #[serde(rename = "_id", with = "object_id_hex")]
    #[schema(value_type = String, example = "665f1c2e9b1e8a3d4c2b1a09")]
    pub id: ObjectId,
    /// Product name
    pub name: String,
    /// Product description
    pub description: String,
    /// Unit price, always greater than zero
    pub price: f64,
    /// Free-form category used for equality filtering
    pub category: String,
    /// Whether the product is currently in stock
    pub in_stock: bool,
    /// Tags in insertion order
    pub tags: Vec<String>,
    /// Creation timestamp, never changed by updates
    pub created_at: DateTime<Utc>,
}

/// DTO for creating a new product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[validate(range(exclusive_min = 0.0, message = "Price must be greater than 0"))]
    pub price: f64,
    #[validate(length(min = 1, message = "category is required"))]
    pub category: String,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Defaults to the time of insertion
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Partial update. Only the fields present in the payload are applied;
/// `createdAt` and `_id` are not patchable.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "description cannot be empty"))]
    pub description: Option<String>,
    #[validate(range(exclusive_min = 0.0, message = "Price must be greater than 0"))]
    pub price: Option<f64>,
    #[validate(length(min = 1, message = "category cannot be empty"))]
    pub category: Option<String>,
    pub in_stock: Option<bool>,
    pub tags: Option<Vec<String>>,
}

/// Confirmation body returned by delete
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteConfirmation {
    pub message: String,
}

fn default_in_stock() -> bool {
    true
}

impl Product {
    /// Build a product from a validated creation request and a fresh identifier
    pub fn new(id: ObjectId, input: CreateProduct) -> Self {
        Self {
            id,
            name: input.name,
            description: input.description,
            price: input.price,
            category: input.category,
            in_stock: input.in_stock,
            tags: input.tags,
            created_at: input.created_at.unwrap_or_else(Utc::now),
        }
    }

    /// Apply a patch in place
    pub fn apply_update(&mut self, update: UpdateProduct) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(in_stock) = update.in_stock {
            self.in_stock = in_stock;
        }
        if let Some(tags) = update.tags {
            self.tags = tags;
        }
    }
}

impl UpdateProduct {
    /// True when the payload carries no field to apply
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Serde adapter rendering an `ObjectId` as its hex string
pub(crate) mod object_id_hex {
    use mongodb::bson::oid::ObjectId;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(id: &ObjectId, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&id.to_hex())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ObjectId, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ObjectId::parse_str(&raw).map_err(D::Error::custom)
    }
}
