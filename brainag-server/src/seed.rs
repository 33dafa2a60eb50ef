//! Demo data
//!
//! Loads through the services, so every validation and invariant applies.

use sqlx::PgPool;
use tracing::info;

use crate::db::Store;
use crate::models::{DocType, LandAreas, NewCrop, NewFarm, NewHarvest, NewProducer};
use crate::services::{CropService, FarmService, HarvestService, ProducerService, ServiceError};

/// Rows created by [`seed`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub producers: usize,
    pub farms: usize,
    pub harvests: usize,
    pub crops: usize,
}

/// Empty every table, dependents first.
pub async fn reset(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("TRUNCATE crops, harvests, farms, producers")
        .execute(pool)
        .await?;
    info!("tables truncated");
    Ok(())
}

/// Two harvests, two producers, five farms and eight crops.
pub async fn seed<S: Store + ?Sized>(store: &S) -> Result<SeedReport, ServiceError> {
    let mut report = SeedReport::default();

    let harvests = HarvestService::new(store);
    let mut harvest_ids = Vec::new();
    for year in [2023, 2024] {
        harvest_ids.push(harvests.create(NewHarvest::new(year)?).await?.id);
        report.harvests += 1;
    }

    let producers = ProducerService::new(store);
    let joao = producers
        .create(NewProducer::new("João da Silva", DocType::Cpf, "529.982.247-25")?)
        .await?
        .id;
    let agrotech = producers
        .create(NewProducer::new("AgroTech LTDA", DocType::Cnpj, "11.222.333/0001-81")?)
        .await?
        .id;
    report.producers = 2;

    let farms = FarmService::new(store);
    let layout = [
        ("Fazenda São Pedro", "Uberlândia", "MG", (100.0, 70.0, 30.0), joao, Some("Soja")),
        ("Fazenda Boa Vista", "Ribeirão Preto", "SP", (80.0, 50.0, 30.0), joao, Some("Milho")),
        ("Fazenda Pantanal", "Cuiabá", "MT", (120.0, 90.0, 30.0), agrotech, Some("Algodão")),
        ("Fazenda Chapada", "Barreiras", "BA", (150.0, 100.0, 50.0), agrotech, Some("Cana-de-açúcar")),
        ("Fazenda Abaiara", "Milagres", "CE", (150.0, 100.0, 50.0), agrotech, None),
    ];

    let crops = CropService::new(store);
    for (name, city, state, (total, arable, vegetation), owner, crop) in layout {
        let areas = LandAreas::new(total, arable, vegetation);
        let farm = farms
            .create(NewFarm::new(name, city, state, areas, owner)?)
            .await?;
        report.farms += 1;

        let Some(crop) = crop else { continue };
        for harvest_id in &harvest_ids {
            crops.create(NewCrop::new(crop, farm.id, *harvest_id)?).await?;
            report.crops += 1;
        }
    }

    info!(?report, "seed complete");
    Ok(report)
}
