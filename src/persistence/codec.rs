//! Line format of the inventory data file.
//!
//! ```text
//! WAREHOUSE:<id>|<name>
//! PRODUCT:<id>|<name>|<quantity>|<reorder_threshold>
//! ```
//!
//! Each `PRODUCT:` line belongs to the closest `WAREHOUSE:` line above it.

use std::collections::HashSet;
use tracing::warn;

use crate::domain::{Product, WarehouseSnapshot};
use crate::error::{InventoryError, InventoryResult};

pub const WAREHOUSE_MARKER: &str = "WAREHOUSE:";
pub const PRODUCT_MARKER: &str = "PRODUCT:";
pub const FIELD_SEPARATOR: char = '|';

/// Warehouses recovered from a data file, plus how many lines were dropped.
#[derive(Debug, Default)]
pub struct Decoded {
    pub warehouses: Vec<WarehouseSnapshot>,
    pub skipped_lines: usize,
}

/// Ids and names are written unescaped, so they must not contain the field
/// separator or line breaks, and fields are trimmed on read, so they must
/// not carry surrounding whitespace either.
pub fn check_storable(field: &str, value: &str) -> InventoryResult<()> {
    if value.contains(FIELD_SEPARATOR) || value.contains('\n') || value.contains('\r') {
        return Err(InventoryError::InvalidArgument(format!(
            "{} cannot contain '{}' or line breaks",
            field, FIELD_SEPARATOR
        )));
    }
    // Fields are trimmed on read.
    if value.trim() != value {
        return Err(InventoryError::InvalidArgument(format!(
            "{} cannot start or end with whitespace",
            field
        )));
    }
    Ok(())
}

pub fn encode(warehouses: &[WarehouseSnapshot]) -> String {
    let mut out = String::new();
    for warehouse in warehouses {
        out.push_str(&format!("{}{}|{}\n", WAREHOUSE_MARKER, warehouse.id, warehouse.name));
        for product in &warehouse.products {
            out.push_str(&format!(
                "{}{}|{}|{}|{}\n",
                PRODUCT_MARKER,
                product.id(),
                product.name(),
                product.quantity(),
                product.reorder_threshold()
            ));
        }
    }
    out
}

/// Parses a data file. Lines that do not form a valid record are skipped.
pub fn decode(text: &str) -> Decoded {
    let mut decoded = Decoded::default();
    let mut seen_warehouses = HashSet::new();
    // Index into `decoded.warehouses` of the warehouse products attach to.
    let mut current: Option<usize> = None;

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        if let Some(rest) = line.strip_prefix(WAREHOUSE_MARKER) {
            current = None;
            let Some((id, name)) = parse_warehouse(rest) else {
                warn!(line_no, "Skipping malformed warehouse record");
                decoded.skipped_lines += 1;
                continue;
            };
            if !seen_warehouses.insert(id.clone()) {
                warn!(line_no, warehouse_id = %id, "Skipping duplicate warehouse record");
                decoded.skipped_lines += 1;
                continue;
            }
            decoded.warehouses.push(WarehouseSnapshot { id, name, products: Vec::new() });
            current = Some(decoded.warehouses.len() - 1);
        } else if let Some(rest) = line.strip_prefix(PRODUCT_MARKER) {
            let Some(slot) = current else {
                warn!(line_no, "Skipping product record outside a warehouse");
                decoded.skipped_lines += 1;
                continue;
            };
            let Some(product) = parse_product(rest) else {
                warn!(line_no, "Skipping malformed product record");
                decoded.skipped_lines += 1;
                continue;
            };
            let warehouse = &mut decoded.warehouses[slot];
            if warehouse.product(product.id()).is_some() {
                warn!(line_no, product_id = %product.id(), "Skipping duplicate product record");
                decoded.skipped_lines += 1;
                continue;
            }
            warehouse.products.push(product);
        } else if !line.trim().is_empty() {
            decoded.skipped_lines += 1;
        }
    }
    decoded
}

fn parse_warehouse(rest: &str) -> Option<(String, String)> {
    let fields: Vec<&str> = rest.split(FIELD_SEPARATOR).map(str::trim).collect();
    if fields.len() < 2 || fields[0].is_empty() || fields[1].is_empty() {
        return None;
    }
    Some((fields[0].to_string(), fields[1].to_string()))
}

fn parse_product(rest: &str) -> Option<Product> {
    let fields: Vec<&str> = rest.split(FIELD_SEPARATOR).map(str::trim).collect();
    if fields.len() < 4 || fields[0].is_empty() || fields[1].is_empty() {
        return None;
    }
    let quantity = fields[2].parse::<u32>().ok()?;
    let threshold = fields[3].parse::<u32>().ok()?;
    Some(Product::new(fields[0], fields[1], quantity, threshold))
}
