use std::sync::Arc;
use chrono::Utc;
use tracing::{info, warn};
use printpilot_catalog::{JobSpecification, PriceCatalog, PricingEngine, Quote};
use printpilot_order::{Order, Receipt};
use crate::repository::{OrderRepository, PriceListRepository};
use crate::CoreResult;

/// Prices a job against the current price list and records the resulting
/// order and receipt.
pub struct OrderOrchestrator {
    catalog: Arc<dyn PriceListRepository>,
    orders: Arc<dyn OrderRepository>,
}

impl OrderOrchestrator {
    pub fn new(catalog: Arc<dyn PriceListRepository>, orders: Arc<dyn OrderRepository>) -> Self {
        Self { catalog, orders }
    }

    async fn load_catalog(&self) -> CoreResult<PriceCatalog> {
        let catalog = PriceCatalog::new(self.catalog.list_entries().await?);
        for ambiguity in catalog.ambiguities() {
            warn!(
                category = %ambiguity.category,
                key = %ambiguity.key,
                matches = ambiguity.matches.len(),
                "Price list has overlapping names; first entry in catalog order wins"
            );
        }
        Ok(catalog)
    }

    /// Price a job without recording anything
    pub async fn quote(&self, job: &JobSpecification) -> CoreResult<Quote> {
        let catalog = self.load_catalog().await?;
        Ok(PricingEngine::new(&catalog).quote(job)?)
    }

    /// Price the job, then write the order and its receipt snapshot.
    pub async fn place_order(
        &self,
        job: JobSpecification,
        payment_method: Option<String>,
    ) -> CoreResult<(Order, Receipt)> {
        let quote = self.quote(&job).await?;
        if quote.breakdown.is_empty() {
            warn!(service_type = job.service_type.as_str(), "No price-list entry matched the job");
        }

        let order = Order::new(job, &quote, payment_method, Utc::now());
        let receipt = Receipt::snapshot(&order, quote);

        self.orders.place_order(&order, &receipt).await?;

        info!(
            job_number = %order.job_number,
            receipt_number = %receipt.receipt_number,
            total = %order.total,
            "Order placed"
        );
        Ok((order, receipt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use printpilot_catalog::{
        Category, NewPriceListEntry, PriceListEntry, PriceListPatch, PrintType, ServiceType,
    };
    use crate::repository::RepoResult;
    use rust_decimal::Decimal;
    use tokio::sync::Mutex;
    use uuid::Uuid;

    #[derive(Default)]
    struct Fixture {
        entries: Mutex<Vec<PriceListEntry>>,
        placed: Mutex<Vec<(Order, Receipt)>>,
    }

    #[async_trait]
    impl PriceListRepository for Fixture {
        async fn list_entries(&self) -> RepoResult<Vec<PriceListEntry>> {
            Ok(self.entries.lock().await.clone())
        }
        async fn get_entry(&self, id: Uuid) -> RepoResult<Option<PriceListEntry>> {
            Ok(self.entries.lock().await.iter().find(|e| e.id == id).cloned())
        }
        async fn create_entry(&self, entry: &PriceListEntry) -> RepoResult<()> {
            self.entries.lock().await.push(entry.clone());
            Ok(())
        }
        async fn update_entry(&self, id: Uuid, patch: PriceListPatch) -> RepoResult<Option<PriceListEntry>> {
            let mut entries = self.entries.lock().await;
            Ok(entries.iter_mut().find(|e| e.id == id).map(|e| {
                e.apply(patch);
                e.clone()
            }))
        }
        async fn delete_entry(&self, id: Uuid) -> RepoResult<bool> {
            let mut entries = self.entries.lock().await;
            let before = entries.len();
            entries.retain(|e| e.id != id);
            Ok(entries.len() != before)
        }
    }

    #[async_trait]
    impl OrderRepository for Fixture {
        async fn place_order(&self, order: &Order, receipt: &Receipt) -> RepoResult<()> {
            self.placed.lock().await.push((order.clone(), receipt.clone()));
            Ok(())
        }
        async fn list_orders(&self) -> RepoResult<Vec<Order>> {
            Ok(self.placed.lock().await.iter().map(|(o, _)| o.clone()).collect())
        }
        async fn get_order(&self, id: Uuid) -> RepoResult<Option<Order>> {
            Ok(self.placed.lock().await.iter().find(|(o, _)| o.id == id).map(|(o, _)| o.clone()))
        }
        async fn get_receipt(&self, order_id: Uuid) -> RepoResult<Option<Receipt>> {
            Ok(self
                .placed
                .lock()
                .await
                .iter()
                .find(|(_, r)| r.order_id == order_id)
                .map(|(_, r)| r.clone()))
        }
    }

    fn job() -> JobSpecification {
        JobSpecification {
            service_type: ServiceType::Printing,
            service_name: None,
            paper_size: Some("A4".to_string()),
            print_type: Some(PrintType::Color),
            quantity: 10,
            custom_width: None,
            custom_height: None,
            finishing_options: Vec::new(),
            additional_specs: None,
        }
    }

    async fn seeded() -> Arc<Fixture> {
        let fixture = Arc::new(Fixture::default());
        for (name, category, cents) in [("A4", Category::Paper, 50), ("Color", Category::Printing, 15)] {
            let entry = PriceListEntry::new(NewPriceListEntry {
                service_name: name.to_string(),
                category,
                base_price: Decimal::new(cents, 2),
                unit: "sheet".to_string(),
                is_active: true,
            });
            fixture.create_entry(&entry).await.unwrap();
        }
        fixture
    }

    #[tokio::test]
    async fn test_place_order_writes_order_and_receipt() {
        let fixture = seeded().await;
        let orchestrator = OrderOrchestrator::new(fixture.clone(), fixture.clone());

        let (order, receipt) = orchestrator.place_order(job(), Some("cash".to_string())).await.unwrap();

        assert_eq!(order.total, Decimal::new(715, 2));
        assert_eq!(receipt.order_id, order.id);
        assert_eq!(receipt.itemized_breakdown.len(), 2);
        assert_eq!(fixture.placed.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_receipt_survives_price_change() {
        let fixture = seeded().await;
        let orchestrator = OrderOrchestrator::new(fixture.clone(), fixture.clone());
        let (order, _) = orchestrator.place_order(job(), None).await.unwrap();

        let a4 = fixture.entries.lock().await[0].id;
        fixture
            .update_entry(a4, PriceListPatch { base_price: Some(Decimal::new(90, 2)), ..Default::default() })
            .await
            .unwrap();
        fixture.delete_entry(a4).await.unwrap();

        let receipt = fixture.get_receipt(order.id).await.unwrap().unwrap();
        assert_eq!(receipt.itemized_breakdown[0].unit_price, Decimal::new(50, 2));
        assert_eq!(receipt.total, Decimal::new(715, 2));

        // A fresh quote reflects the edit; the stored receipt does not.
        let requote = orchestrator.quote(&job()).await.unwrap();
        assert_eq!(requote.total, Decimal::new(165, 2));
    }
}
