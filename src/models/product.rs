use serde::{Deserialize, Serialize};

/// A stocked product row. `id` is generated by the database and never rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub stock: i32,
}

// ── Request payloads ─────────────────────────────────────────────────────────

/// Body of both create and update. Any `id` sent by the client is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub stock: i32,
}

#[cfg(test)]
impl NewProduct {
    pub fn with_id(&self, id: i64) -> Product {
        Product {
            id,
            name: self.name.clone(),
            stock: self.stock,
        }
    }
}

// ── Query parameters ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ReadOptions {
    #[serde(default)]
    pub links: bool,
}

// ── Hypermedia ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Link {
    pub rel: &'static str,
    pub method: &'static str,
    pub uri: String,
    pub desc: &'static str,
}

/// A single product as rendered by `GET {base}/:id`, optionally carrying links.
#[derive(Debug, Serialize)]
pub struct ProductRepresentation {
    #[serde(flatten)]
    pub product: Product,
    #[serde(rename = "_links", skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<Link>>,
}

impl ProductRepresentation {
    pub fn plain(product: Product) -> Self {
        Self {
            product,
            links: None,
        }
    }

    /// Attach navigation links relative to the collection path `base`.
    pub fn with_links(product: Product, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        let id = product.id;
        let links = vec![
            Link {
                rel: "self",
                method: "GET",
                uri: format!("{}/{}", base, id),
                desc: "Retrieve this product",
            },
            Link {
                rel: "prev",
                method: "GET",
                uri: format!("{}/{}", base, id.saturating_sub(1)),
                desc: "Retrieve previous product",
            },
            Link {
                rel: "next",
                method: "GET",
                uri: format!("{}/{}", base, id.saturating_add(1)),
                desc: "Retrieve next product",
            },
            Link {
                rel: "product/delete",
                method: "DELETE",
                uri: format!("{}/{}", base, id),
                desc: "Delete this product",
            },
            Link {
                rel: "product/list",
                method: "GET",
                uri: base.to_string(),
                desc: "Get all products",
            },
            Link {
                rel: "product/edit",
                method: "PUT",
                uri: format!("{}/{}", base, id),
                desc: "Edit this product",
            },
        ];
        Self {
            product,
            links: Some(links),
        }
    }
}
