pub mod geo;

use crate::config::Config;
use crate::repository::{
    CenterRepository, CropRepository, FarmRepository, PriceRepository, ProducerRepository,
    RouteRepository, SupplyRepository, TrainingRepository, TransactionRepository,
};
use sqlx::PgPool;

pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    pub producers: ProducerRepository,
    pub farms: FarmRepository,
    pub crops: CropRepository,
    pub centers: CenterRepository,
    pub routes: RouteRepository,
    pub supplies: SupplyRepository,
    pub training: TrainingRepository,
    pub prices: PriceRepository,
    pub transactions: TransactionRepository,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            producers: ProducerRepository::new(db.clone()),
            farms: FarmRepository::new(db.clone()),
            crops: CropRepository::new(db.clone()),
            centers: CenterRepository::new(db.clone()),
            routes: RouteRepository::new(db.clone()),
            supplies: SupplyRepository::new(db.clone()),
            training: TrainingRepository::new(db.clone()),
            prices: PriceRepository::new(db.clone()),
            transactions: TransactionRepository::new(db.clone()),
            db,
            config,
        }
    }
}
