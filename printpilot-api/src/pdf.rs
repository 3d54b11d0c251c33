//! Receipt and report documents rendered with `genpdf`.
//!
//! Rendering is synchronous and CPU bound; handlers run it on the blocking
//! pool.

use genpdf::elements::{Break, FrameCellDecorator, Paragraph, TableLayout};
use genpdf::style::Style;
use genpdf::{Alignment, Document, Element, SimplePageDecorator};
use rust_decimal::Decimal;
use printpilot_catalog::{PrintType, ServiceType, TAX_PERCENT};
use printpilot_order::{IncomeReport, Order, Receipt};
use printpilot_shared::format2;
use printpilot_store::app_config::{PdfConfig, ShopConfig};

#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    #[error("failed to load font family '{family}' from '{dir}': {source}")]
    Font {
        dir: String,
        family: String,
        #[source]
        source: genpdf::error::Error,
    },

    #[error("failed to render document: {0}")]
    Render(#[from] genpdf::error::Error),
}

fn new_document(pdf: &PdfConfig, title: &str) -> Result<Document, PdfError> {
    let family = genpdf::fonts::from_files(&pdf.font_dir, &pdf.font_family, None).map_err(|source| {
        PdfError::Font {
            dir: pdf.font_dir.clone(),
            family: pdf.font_family.clone(),
            source,
        }
    })?;

    let mut doc = Document::new(family);
    doc.set_title(title);
    doc.set_font_size(10);
    doc.set_line_spacing(1.25);

    let mut decorator = SimplePageDecorator::new();
    decorator.set_margins(18);
    doc.set_page_decorator(decorator);
    Ok(doc)
}

fn centered(text: &str, size: u8) -> impl Element {
    Paragraph::new(text)
        .aligned(Alignment::Center)
        .styled(Style::new().with_font_size(size))
}

fn heading(text: &str) -> impl Element {
    Paragraph::new(text).styled(Style::new().bold().with_font_size(13))
}

fn push_letterhead(doc: &mut Document, shop: &ShopConfig) {
    doc.push(
        Paragraph::new(shop.name.as_str())
            .aligned(Alignment::Center)
            .styled(Style::new().bold().with_font_size(22)),
    );
    if let Some(tagline) = &shop.tagline {
        doc.push(centered(tagline, 12));
    }
    doc.push(Break::new(0.5));
    for line in &shop.address_lines {
        doc.push(centered(line, 10));
    }
    if let Some(contact) = &shop.contact {
        doc.push(centered(contact, 10));
    }
    doc.push(Break::new(1.5));
}

pub(crate) fn money(shop: &ShopConfig, value: Decimal) -> String {
    format!("{}{}", shop.currency_symbol, format2(value))
}

/// The "Job Details" lines printed above the itemized table.
pub(crate) fn job_details(order: &Order) -> Vec<String> {
    let mut lines = Vec::new();
    let service_type = match order.service_type {
        ServiceType::Printing => "Printing",
        ServiceType::LargeFormat => "Large Format",
        ServiceType::Products => "Products",
    };
    lines.push(format!("Service Type: {}", service_type));
    if let Some(name) = &order.service_name {
        lines.push(format!("Service: {}", name));
    }
    if let Some(size) = &order.paper_size {
        lines.push(format!("Paper Size: {}", size));
    }
    lines.push(format!("Quantity: {}", order.quantity));
    if let Some(print_type) = order.print_type {
        let label = match print_type {
            PrintType::Color => "Color Printing",
            PrintType::Mono => "Monochrome Printing",
        };
        lines.push(format!("Print Type: {}", label));
    }
    if let (Some(width), Some(height)) = (order.custom_width, order.custom_height) {
        lines.push(format!("Dimensions: {} × {} sqft", width.normalize(), height.normalize()));
    }
    if !order.finishing_options.is_empty() {
        lines.push(format!("Finishing Options: {}", order.finishing_options.join(", ")));
    }
    if let Some(specs) = &order.additional_specs {
        lines.push(format!("Additional Specs: {}", specs));
    }
    lines
}

fn total_row(table: &mut TableLayout, label: &str, amount: String, style: Style) -> Result<(), PdfError> {
    table
        .row()
        .element(Paragraph::new(""))
        .element(Paragraph::new(""))
        .element(Paragraph::new(label).styled(style.clone()))
        .element(Paragraph::new(amount).aligned(Alignment::Right).styled(style))
        .push()?;
    Ok(())
}

pub fn render_receipt(
    shop: &ShopConfig,
    pdf: &PdfConfig,
    order: &Order,
    receipt: &Receipt,
) -> Result<Vec<u8>, PdfError> {
    let mut doc = new_document(pdf, &format!("Receipt {}", receipt.receipt_number))?;
    push_letterhead(&mut doc, shop);

    doc.push(
        Paragraph::new("RECEIPT")
            .aligned(Alignment::Center)
            .styled(Style::new().bold().with_font_size(20)),
    );
    doc.push(Break::new(1));
    for line in [
        format!("Receipt #: {}", receipt.receipt_number),
        format!("Job #: {}", order.job_number),
        format!("Date: {}", receipt.created_at.format("%Y-%m-%d")),
    ] {
        doc.push(Paragraph::new(line).aligned(Alignment::Right));
    }
    doc.push(Break::new(1.5));

    doc.push(heading("Job Details"));
    doc.push(Break::new(0.5));
    for line in job_details(order) {
        doc.push(Paragraph::new(line));
    }
    doc.push(Break::new(1.5));

    doc.push(heading("Itemized Breakdown"));
    doc.push(Break::new(0.5));

    let bold = || Style::new().bold();
    let mut table = TableLayout::new(vec![4, 3, 2, 2]);
    table.set_cell_decorator(FrameCellDecorator::new(false, false, false));
    table
        .row()
        .element(Paragraph::new("Service").styled(bold()))
        .element(Paragraph::new("Quantity").styled(bold()))
        .element(Paragraph::new("Unit Price").styled(bold()))
        .element(Paragraph::new("Total").aligned(Alignment::Right).styled(bold()))
        .push()?;
    for item in &receipt.itemized_breakdown {
        table
            .row()
            .element(Paragraph::new(item.service.as_str()))
            .element(Paragraph::new(item.quantity.to_string()))
            .element(Paragraph::new(money(shop, item.unit_price)))
            .element(Paragraph::new(money(shop, item.total)).aligned(Alignment::Right))
            .push()?;
    }
    total_row(&mut table, "Subtotal:", money(shop, receipt.subtotal), Style::new())?;
    total_row(&mut table, &format!("Tax ({}%):", TAX_PERCENT), money(shop, receipt.tax), Style::new())?;
    total_row(
        &mut table,
        "Grand Total:",
        money(shop, receipt.total),
        Style::new().bold().with_font_size(12),
    )?;
    doc.push(table);

    doc.push(Break::new(3));
    doc.push(centered("Thank you for your business!", 10));
    if let Some(contact) = &shop.contact {
        doc.push(centered(&format!("For any questions, please contact us: {}", contact), 10));
    }

    let mut out = Vec::new();
    doc.render(&mut out)?;
    Ok(out)
}

/// Titled income/expense summary, e.g. "Weekly Income & Expense Report".
pub fn render_report(
    shop: &ShopConfig,
    pdf: &PdfConfig,
    title: &str,
    period_label: &str,
    report: &IncomeReport,
) -> Result<Vec<u8>, PdfError> {
    let mut doc = new_document(pdf, title)?;
    push_letterhead(&mut doc, shop);

    doc.push(
        Paragraph::new(title)
            .aligned(Alignment::Center)
            .styled(Style::new().bold().with_font_size(18)),
    );
    doc.push(centered(period_label, 12));
    doc.push(Break::new(2));

    doc.push(heading("Income Summary"));
    doc.push(Paragraph::new(format!(
        "Orders ({}): {}",
        report.order_count,
        money(shop, report.order_income)
    )));
    doc.push(Paragraph::new(format!(
        "Counter sales ({}): {}",
        report.sale_count,
        money(shop, report.sales_income)
    )));
    doc.push(Paragraph::new(format!("Total Income: {}", money(shop, report.total_income))));
    doc.push(Break::new(1));

    doc.push(heading("Expense Summary"));
    doc.push(Paragraph::new(format!(
        "Total Expenses ({}): {}",
        report.expense_count,
        money(shop, report.total_expenses)
    )));
    doc.push(Break::new(2));

    doc.push(heading("Net Income"));
    doc.push(
        Paragraph::new(money(shop, report.net_income)).styled(Style::new().bold().with_font_size(12)),
    );

    let mut out = Vec::new();
    doc.render(&mut out)?;
    Ok(out)
}
