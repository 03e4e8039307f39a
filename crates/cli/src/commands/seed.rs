//! Seed the database by registering visits.
//!
//! Goes through the same visit service as the web handlers, so seeded
//! counts follow the normal registration rules.

use std::sync::Arc;

use tracing::info;

use greeter_web::db::{self, PgVisitorStore};
use greeter_web::services::VisitService;

/// Register one visit for each name, in order.
///
/// Repeating a name registers it repeatedly.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the database is
/// unreachable, or a registration fails.
pub async fn visits(names: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let database_url = super::database_url().ok_or("GREETER_DATABASE_URL not set")?;

    let pool = db::create_pool(&database_url, 2).await?;
    let service = VisitService::new(Arc::new(PgVisitorStore::new(pool)));

    for name in names {
        let visitor = service.register_visit(name).await?;
        info!(
            id = ?visitor.id,
            name = %visitor.name,
            visit_count = visitor.visit_count,
            "Seeded visit"
        );
    }

    info!(count = names.len(), "Seeding complete");
    Ok(())
}
