pub mod center_repo;
pub mod crop_repo;
pub mod farm_repo;
pub mod price_repo;
pub mod producer_repo;
pub mod route_repo;
pub mod supply_repo;
pub mod training_repo;
pub mod transaction_repo;

pub use center_repo::CenterRepository;
pub use crop_repo::CropRepository;
pub use farm_repo::FarmRepository;
pub use price_repo::PriceRepository;
pub use producer_repo::ProducerRepository;
pub use route_repo::RouteRepository;
pub use supply_repo::SupplyRepository;
pub use training_repo::TrainingRepository;
pub use transaction_repo::TransactionRepository;

/// LIMIT/OFFSET pair already clamped by the handler layer.
#[derive(Clone, Copy, Debug)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}
