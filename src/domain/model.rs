use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub type ProductId = u64;

/// 目錄服務回傳的商品屬性
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: ProductId,
    pub title: String,
    pub price: f64,
    pub image: String,
}

/// 庫存服務回報的可用數量上限
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockRecord {
    pub product_id: ProductId,
    pub amount: i64,
}

/// One product's entry in the cart. Display attributes are captured when the
/// line is first added and never refreshed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(rename = "id")]
    pub product_id: ProductId,
    pub title: String,
    pub price: f64,
    pub image: String,
    pub amount: u32,
}

impl CartLine {
    pub fn from_catalog(entry: CatalogEntry, amount: u32) -> Self {
        Self {
            product_id: entry.id,
            title: entry.title,
            price: entry.price,
            image: entry.image,
            amount,
        }
    }

    pub fn with_amount(&self, amount: u32) -> Self {
        Self {
            amount,
            ..self.clone()
        }
    }

    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.amount)
    }
}

/// Insertion-ordered collection of cart lines, at most one per product.
///
/// Serialized as a JSON array of lines so the stored form stays a plain
/// ordered sequence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct Cart {
    lines: IndexMap<ProductId, CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.get(&product_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.values()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns a new cart with `line` replacing the line for the same product,
    /// or appended when the product is not yet present.
    pub fn with_line(&self, line: CartLine) -> Cart {
        let mut lines = self.lines.clone();
        // insert 對已存在的鍵保留原位置
        lines.insert(line.product_id, line);
        Cart { lines }
    }

    /// Returns a new cart without the product, or `None` if it is absent.
    pub fn without(&self, product_id: ProductId) -> Option<Cart> {
        if !self.lines.contains_key(&product_id) {
            return None;
        }
        let mut lines = self.lines.clone();
        lines.shift_remove(&product_id);
        Some(Cart { lines })
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u64 {
        self.lines.values().map(|line| u64::from(line.amount)).sum()
    }

    pub fn subtotal(&self) -> f64 {
        self.lines.values().map(CartLine::subtotal).sum()
    }
}

// IndexMap 的比較不看順序，購物車的順序必須一致
impl PartialEq for Cart {
    fn eq(&self, other: &Self) -> bool {
        self.lines.iter().eq(other.lines.iter())
    }
}

impl From<Vec<CartLine>> for Cart {
    fn from(stored: Vec<CartLine>) -> Self {
        let mut lines = IndexMap::with_capacity(stored.len());
        for line in stored {
            if line.amount == 0 {
                tracing::warn!("Dropping stored line for product {} with zero amount", line.product_id);
                continue;
            }
            if lines.contains_key(&line.product_id) {
                tracing::warn!("Dropping duplicate stored line for product {}", line.product_id);
                continue;
            }
            lines.insert(line.product_id, line);
        }
        Cart { lines }
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines.into_values().collect()
    }
}

impl FromIterator<CartLine> for Cart {
    fn from_iter<I: IntoIterator<Item = CartLine>>(iter: I) -> Self {
        Cart::from(iter.into_iter().collect::<Vec<_>>())
    }
}
