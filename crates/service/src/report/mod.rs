//! On-demand catalog report: one workbook, two worksheets.
//!
//! "Statistics" carries chart trios (bar/line/pie) for the ten most expensive
//! and ten cheapest products at fixed anchors, plus a per-category histogram.
//! "Data" carries windowed tables sliced from the product list.

pub mod charts;

use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use sea_orm::{DatabaseConnection, Order};
use std::ops::Range;
use tracing::info;

use models::{category, product};

use crate::catalog::{category_service, product_service};
use crate::catalog::category_service::CategoryCount;
use crate::errors::ServiceError;

/// Fixed attachment filename for the download.
pub const REPORT_FILENAME: &str = "catalog_report.xlsx";
/// MIME type of the rendered workbook.
pub const CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const STATS_SHEET: &str = "Statistics";
const DATA_SHEET: &str = "Data";

// Chart anchors on the statistics sheet, 0-based (B2, B23, AH2 / R2, O23, AB24 / B44).
const EXPENSIVE_BAR: (u32, u16) = (1, 1);
const EXPENSIVE_LINE: (u32, u16) = (22, 1);
const EXPENSIVE_PIE: (u32, u16) = (1, 33);
const CHEAP_BAR: (u32, u16) = (1, 17);
const CHEAP_LINE: (u32, u16) = (22, 14);
const CHEAP_PIE: (u32, u16) = (23, 27);
const HISTOGRAM: (u32, u16) = (43, 1);

// Hidden data-region columns backing the chart series.
const EXPENSIVE_DATA_COL: u16 = 51;
const CHEAP_DATA_COL: u16 = 54;
const CATEGORY_DATA_COL: u16 = 57;

// "Data" sheet: tables of 10 rows at anchors striding 12 rows apart.
const TABLE_ROW_LEN: usize = 10;
const TABLE_STRIDE: usize = 12;
const TABLE_COUNT: usize = 5;
const TABLE_FIRST_ROW: u32 = 1;
const TABLE_COL: u16 = 1;

const TABLE_HEADERS: [&str; 4] = ["Product", "Description", "Price", "Category"];

/// Build the report workbook and return its bytes.
///
/// An empty catalog is a validation error rather than a blank workbook.
pub async fn build_catalog_report(db: &DatabaseConnection) -> Result<Vec<u8>, ServiceError> {
    let most_expensive = product_service::products_by_price(db, Order::Desc, 10).await?;
    if most_expensive.is_empty() {
        return Err(ServiceError::Validation("catalog is empty".into()));
    }
    let cheapest = product_service::products_by_price(db, Order::Asc, 10).await?;
    let category_counts = category_service::product_counts(db).await?;
    let table_limit = (TABLE_COUNT * TABLE_STRIDE) as u64;
    let table_rows = product_service::products_with_categories(db, table_limit).await?;

    let bytes = render_workbook(&most_expensive, &cheapest, &category_counts, &table_rows)
        .map_err(xlsx_err)?;
    info!(
        products = table_rows.len(),
        categories = category_counts.len(),
        bytes = bytes.len(),
        "catalog report rendered"
    );
    Ok(bytes)
}

fn xlsx_err(e: XlsxError) -> ServiceError {
    ServiceError::Report(e.to_string())
}

fn render_workbook(
    most_expensive: &[product::Model],
    cheapest: &[product::Model],
    category_counts: &[CategoryCount],
    table_rows: &[(product::Model, category::Model)],
) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();

    let stats = workbook.add_worksheet();
    stats.set_name(STATS_SHEET)?;
    write_statistics_sheet(stats, most_expensive, cheapest, category_counts)?;

    let data = workbook.add_worksheet();
    data.set_name(DATA_SHEET)?;
    write_data_sheet(data, table_rows)?;

    workbook.save_to_buffer()
}

fn price_points(products: &[product::Model]) -> Vec<(String, f64)> {
    products
        .iter()
        .map(|p| (p.name.clone(), p.price.to_f64().unwrap_or(0.0)))
        .collect()
}

fn write_statistics_sheet(
    ws: &mut Worksheet,
    most_expensive: &[product::Model],
    cheapest: &[product::Model],
    category_counts: &[CategoryCount],
) -> Result<(), XlsxError> {
    let expensive = charts::write_series(
        ws,
        STATS_SHEET,
        "Price",
        0,
        EXPENSIVE_DATA_COL,
        &price_points(most_expensive),
    )?;
    ws.insert_chart(
        EXPENSIVE_BAR.0,
        EXPENSIVE_BAR.1,
        &charts::bar(&expensive, "Most expensive gallery", "Product", "Price"),
    )?;
    ws.insert_chart(
        EXPENSIVE_LINE.0,
        EXPENSIVE_LINE.1,
        &charts::line(&expensive, "Most expensive gallery", "Product", "Price"),
    )?;
    ws.insert_chart(
        EXPENSIVE_PIE.0,
        EXPENSIVE_PIE.1,
        &charts::pie(&expensive, "Most expensive gallery"),
    )?;

    let cheap = charts::write_series(
        ws,
        STATS_SHEET,
        "Price",
        0,
        CHEAP_DATA_COL,
        &price_points(cheapest),
    )?;
    ws.insert_chart(
        CHEAP_BAR.0,
        CHEAP_BAR.1,
        &charts::bar(&cheap, "Cheapest gallery", "Product", "Price"),
    )?;
    ws.insert_chart(
        CHEAP_LINE.0,
        CHEAP_LINE.1,
        &charts::line(&cheap, "Cheapest gallery", "Product", "Price"),
    )?;
    ws.insert_chart(CHEAP_PIE.0, CHEAP_PIE.1, &charts::pie(&cheap, "Cheapest gallery"))?;

    let count_points: Vec<(String, f64)> = category_counts
        .iter()
        .map(|c| (c.name.clone(), c.count as f64))
        .collect();
    let histogram = charts::write_series(
        ws,
        STATS_SHEET,
        "Products",
        0,
        CATEGORY_DATA_COL,
        &count_points,
    )?;
    ws.insert_chart(
        HISTOGRAM.0,
        HISTOGRAM.1,
        &charts::histogram(&histogram, "Products per category", "Category", "Count"),
    )?;

    for col in [
        EXPENSIVE_DATA_COL,
        EXPENSIVE_DATA_COL + 1,
        CHEAP_DATA_COL,
        CHEAP_DATA_COL + 1,
        CATEGORY_DATA_COL,
        CATEGORY_DATA_COL + 1,
    ] {
        ws.set_column_hidden(col)?;
    }
    Ok(())
}

/// Table windows over the product list: 10-row slices whose start offsets
/// stride by 12, paired with the 0-based worksheet row of each table header.
fn table_windows(total: usize) -> Vec<(u32, Range<usize>)> {
    (0..TABLE_COUNT)
        .map(|t| {
            let start = t * TABLE_STRIDE;
            let end = (start + TABLE_ROW_LEN).min(total);
            let anchor = TABLE_FIRST_ROW + (t * TABLE_STRIDE) as u32;
            (anchor, start..end.max(start))
        })
        .filter(|(_, window)| !window.is_empty())
        .collect()
}

fn write_data_sheet(
    ws: &mut Worksheet,
    rows: &[(product::Model, category::Model)],
) -> Result<(), XlsxError> {
    let header = Format::new()
        .set_bold()
        .set_font_color("#FFFFFF")
        .set_background_color(charts::HISTOGRAM_FILL);
    let money = Format::new().set_num_format("0.00");

    ws.set_column_width(TABLE_COL, 28)?;
    ws.set_column_width(TABLE_COL + 1, 48)?;
    ws.set_column_width(TABLE_COL + 2, 12)?;
    ws.set_column_width(TABLE_COL + 3, 20)?;

    for (anchor, window) in table_windows(rows.len()) {
        for (offset, title) in TABLE_HEADERS.iter().enumerate() {
            ws.write_string_with_format(anchor, TABLE_COL + offset as u16, *title, &header)?;
        }
        for (i, (p, c)) in rows[window].iter().enumerate() {
            let row = anchor + 1 + i as u32;
            ws.write_string(row, TABLE_COL, p.name.as_str())?;
            ws.write_string(row, TABLE_COL + 1, p.description.as_str())?;
            ws.write_number_with_format(
                row,
                TABLE_COL + 2,
                p.price.to_f64().unwrap_or(0.0),
                &money,
            )?;
            ws.write_string(row, TABLE_COL + 3, c.name.as_str())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn sample_category(name: &str) -> category::Model {
        category::Model {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn sample_product(name: &str, cents: i64, cat: &category::Model) -> product::Model {
        let now = Utc::now().into();
        product::Model {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: format!("{} description", name),
            price: Decimal::new(cents, 2),
            image: None,
            category_id: cat.id,
            created_at: now,
            updated_at: now,
        }
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn windows_stride_and_clip() {
        let windows = table_windows(58);
        assert_eq!(windows.len(), 5);
        assert_eq!(windows[0], (1, 0..10));
        assert_eq!(windows[1], (13, 12..22));
        assert_eq!(windows[4], (49, 48..58));

        // Short catalogs produce fewer, shorter tables.
        let windows = table_windows(15);
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[1], (13, 12..15));

        assert!(table_windows(0).is_empty());
    }

    #[test]
    fn renders_two_worksheet_workbook() {
        let cat_a = sample_category("Kitchen");
        let cat_b = sample_category("Garden");
        let products: Vec<product::Model> = (0..12)
            .map(|i| {
                let cat = if i % 2 == 0 { &cat_a } else { &cat_b };
                sample_product(&format!("Item {}", i), 1000 + i * 250, cat)
            })
            .collect();

        let mut by_price = products.clone();
        by_price.sort_by(|a, b| b.price.cmp(&a.price));
        let most_expensive: Vec<_> = by_price.iter().take(10).cloned().collect();
        let cheapest: Vec<_> = by_price.iter().rev().take(10).cloned().collect();

        let counts = vec![
            CategoryCount { id: cat_a.id, name: cat_a.name.clone(), count: 6 },
            CategoryCount { id: cat_b.id, name: cat_b.name.clone(), count: 6 },
        ];
        let table_rows: Vec<_> = products
            .iter()
            .map(|p| {
                let cat = if p.category_id == cat_a.id { &cat_a } else { &cat_b };
                (p.clone(), cat.clone())
            })
            .collect();

        let bytes = render_workbook(&most_expensive, &cheapest, &counts, &table_rows)
            .expect("workbook renders");
        assert!(!bytes.is_empty());
        // xlsx archives store member names verbatim; both sheets must exist.
        assert!(contains(&bytes, b"xl/worksheets/sheet1.xml"));
        assert!(contains(&bytes, b"xl/worksheets/sheet2.xml"));
    }
}
