//! Dashboard aggregate queries

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::DbError;
use crate::db::criteria::push_where;
use crate::models::{AreaTotals, CropCount, Criteria, StateCount};

/// Read-only aggregates over farms and crops
pub struct DashboardRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> DashboardRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn count_farms(&self, scope: &Criteria) -> Result<i64, DbError> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM farms");
        push_where(&mut query, scope);
        Ok(query
            .build_query_scalar::<i64>()
            .fetch_one(self.pool)
            .await?)
    }

    /// Area sums; `COALESCE` turns an empty scope into zeros.
    pub async fn sum_farm_areas(&self, scope: &Criteria) -> Result<AreaTotals, DbError> {
        let mut query = QueryBuilder::<Postgres>::new(
            "SELECT \
                COALESCE(SUM(total_area), 0)::DOUBLE PRECISION, \
                COALESCE(SUM(arable_area), 0)::DOUBLE PRECISION, \
                COALESCE(SUM(vegetation_area), 0)::DOUBLE PRECISION \
             FROM farms",
        );
        push_where(&mut query, scope);

        let (total, arable, vegetation): (f64, f64, f64) =
            query.build_query_as().fetch_one(self.pool).await?;

        Ok(AreaTotals {
            total,
            arable,
            vegetation,
        })
    }

    pub async fn count_farms_by_state(&self, scope: &Criteria) -> Result<Vec<StateCount>, DbError> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT state, COUNT(*) FROM farms");
        push_where(&mut query, scope);
        query.push(" GROUP BY state ORDER BY state");

        let rows: Vec<(String, i64)> = query.build_query_as().fetch_all(self.pool).await?;
        Ok(rows
            .into_iter()
            .map(|(state, count)| StateCount { state, count })
            .collect())
    }

    pub async fn farm_ids_for_producer(&self, producer_id: Uuid) -> Result<Vec<Uuid>, DbError> {
        Ok(sqlx::query_scalar("SELECT id FROM farms WHERE producer_id = $1")
            .bind(producer_id)
            .fetch_all(self.pool)
            .await?)
    }

    pub async fn count_crops_by_name(&self, scope: &Criteria) -> Result<Vec<CropCount>, DbError> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT name, COUNT(*) FROM crops");
        push_where(&mut query, scope);
        query.push(" GROUP BY name ORDER BY name");

        let rows: Vec<(String, i64)> = query.build_query_as().fetch_all(self.pool).await?;
        Ok(rows
            .into_iter()
            .map(|(name, count)| CropCount { name, count })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::{CropRepo, FarmRepo, HarvestRepo, ProducerRepo};
    use crate::db::MIGRATOR;
    use crate::models::{
        DashboardFilter, DocType, LandAreas, NewCrop, NewFarm, NewHarvest, NewProducer,
    };

    #[sqlx::test(migrator = "MIGRATOR")]
    #[ignore = "requires database"]
    async fn empty_database_yields_zeros(pool: PgPool) -> Result<(), DbError> {
        let repo = DashboardRepo::new(&pool);
        let scope = Criteria::new();

        assert_eq!(repo.count_farms(&scope).await?, 0);
        assert_eq!(repo.sum_farm_areas(&scope).await?, AreaTotals::default());
        assert!(repo.count_farms_by_state(&scope).await?.is_empty());
        assert!(repo.count_crops_by_name(&scope).await?.is_empty());
        Ok(())
    }

    #[sqlx::test(migrator = "MIGRATOR")]
    #[ignore = "requires database"]
    async fn aggregates_respect_scope(pool: PgPool) -> Result<(), DbError> {
        let producer = ProducerRepo::new(&pool)
            .create(&NewProducer::new("João", DocType::Cpf, "52998224725").unwrap())
            .await?;
        let farms = FarmRepo::new(&pool);
        let mg = farms
            .create(
                &NewFarm::new("A", "Uberaba", "MG", LandAreas::new(100.0, 60.0, 30.0), producer.id)
                    .unwrap(),
            )
            .await?;
        farms
            .create(
                &NewFarm::new("B", "Campinas", "SP", LandAreas::new(50.0, 20.0, 10.0), producer.id)
                    .unwrap(),
            )
            .await?;
        let harvest = HarvestRepo::new(&pool)
            .create(&NewHarvest::new(2024).unwrap())
            .await?;
        CropRepo::new(&pool)
            .create(&NewCrop::new("Soja", mg.id, harvest.id).unwrap())
            .await?;

        let repo = DashboardRepo::new(&pool);
        let filter = DashboardFilter::new(Some(producer.id), Some("MG"), None);
        let scope = filter.farm_scope();
        assert_eq!(repo.count_farms(&scope).await?, 1);
        assert_eq!(repo.sum_farm_areas(&scope).await?.total, 100.0);

        let all = repo.count_farms_by_state(&Criteria::new()).await?;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].state, "MG");

        let ids = repo.farm_ids_for_producer(producer.id).await?;
        assert_eq!(ids.len(), 2);
        let crops = repo.count_crops_by_name(&filter.crop_scope(Some(ids))).await?;
        assert_eq!(crops, vec![CropCount { name: "Soja".into(), count: 1 }]);

        let crops = repo
            .count_crops_by_name(&filter.crop_scope(Some(Vec::new())))
            .await?;
        assert!(crops.is_empty());
        Ok(())
    }
}
