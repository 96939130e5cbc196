// src/services/schedule_service.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ChurchStore, ScheduleStore},
    models::event::{CreateSchedulePayload, NewSchedule, Schedule, ScheduleConflict},
};

#[derive(Clone)]
pub struct ScheduleService {
    schedules: Arc<dyn ScheduleStore>,
    churches: Arc<dyn ChurchStore>,
}

impl ScheduleService {
    pub fn new(schedules: Arc<dyn ScheduleStore>, churches: Arc<dyn ChurchStore>) -> Self {
        Self { schedules, churches }
    }

    /// Outras escalas da pessoa num evento da igreja com o mesmo horário exato.
    /// Pessoa de outra igreja é `NotFound`.
    pub async fn check_conflicts(
        &self,
        church_id: Uuid,
        user_id: Uuid,
        event_date: DateTime<Utc>,
        exclude_event_id: Option<Uuid>,
    ) -> Result<Vec<ScheduleConflict>, AppError> {
        self.ensure_member_of(church_id, user_id).await?;
        self.schedules
            .find_conflicts(church_id, user_id, event_date, exclude_event_id)
            .await
    }

    /// Escala a pessoa, recusando se ela já estiver em outro evento no mesmo horário.
    pub async fn assign(
        &self,
        church_id: Uuid,
        payload: CreateSchedulePayload,
    ) -> Result<Schedule, AppError> {
        let event = self
            .schedules
            .find_event(church_id, payload.event_id)
            .await?
            .ok_or(AppError::NotFound)?;

        self.schedules
            .find_ministry(church_id, payload.ministry_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let conflicts = self
            .check_conflicts(church_id, payload.user_id, event.event_date, Some(event.id))
            .await?;
        if let Some(first) = conflicts.into_iter().next() {
            return Err(AppError::SchedulingConflict {
                event_id: first.conflict_event_id,
                event_title: first.conflict_event_title,
                role: first.conflict_role,
            });
        }

        self.schedules
            .create_schedule(NewSchedule {
                event_id: event.id,
                ministry_id: payload.ministry_id,
                user_id: payload.user_id,
                role: payload.role,
                notes: payload.notes,
            })
            .await
    }

    async fn ensure_member_of(&self, church_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        self.churches
            .find_profile(user_id)
            .await?
            .filter(|p| p.church_id == Some(church_id))
            .map(|_| ())
            .ok_or(AppError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    use crate::{
        db::memory::MemoryStore,
        models::member::NewProfile,
    };

    struct Fixture {
        store: Arc<MemoryStore>,
        service: ScheduleService,
        church_id: Uuid,
        user_id: Uuid,
        ministry_id: Uuid,
    }

    async fn add_person(store: &MemoryStore, church_id: Uuid, name: &str) -> Uuid {
        let user_id = Uuid::new_v4();
        store
            .create_profile(NewProfile {
                id: user_id,
                church_id,
                name: name.into(),
                phone: None,
                photo_url: None,
            })
            .await
            .unwrap();
        user_id
    }

    async fn setup() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let church_id = Uuid::new_v4();
        let user_id = add_person(&store, church_id, "Carlos").await;
        let ministry_id = store.insert_ministry(church_id, "Louvor").id;
        let service = ScheduleService::new(store.clone(), store.clone());
        Fixture { store, service, church_id, user_id, ministry_id }
    }

    impl Fixture {
        fn request(&self, event_id: Uuid, role: &str) -> CreateSchedulePayload {
            CreateSchedulePayload {
                event_id,
                ministry_id: self.ministry_id,
                user_id: self.user_id,
                role: role.into(),
                notes: None,
            }
        }
    }

    #[tokio::test]
    async fn same_timestamp_on_another_event_conflicts() {
        let f = setup().await;
        let t = Utc.with_ymd_and_hms(2025, 3, 2, 19, 0, 0).unwrap();
        let a = f.store.insert_event(f.church_id, "Culto de Domingo", t);
        let b = f.store.insert_event(f.church_id, "Ensaio Geral", t);
        let c = f.store.insert_event(f.church_id, "Culto de Quarta", t + Duration::days(3));

        f.service.assign(f.church_id, f.request(a.id, "Baterista")).await.unwrap();

        let err = f
            .service
            .assign(f.church_id, f.request(b.id, "Vocal"))
            .await
            .unwrap_err();
        match err {
            AppError::SchedulingConflict { event_id, event_title, role } => {
                assert_eq!(event_id, a.id);
                assert_eq!(event_title, "Culto de Domingo");
                assert_eq!(role, "Baterista");
            }
            other => panic!("esperava conflito, veio {:?}", other),
        }

        f.service.assign(f.church_id, f.request(c.id, "Vocal")).await.unwrap();
        assert_eq!(f.store.snapshot().schedules.len(), 2);
    }

    #[tokio::test]
    async fn a_second_role_in_the_same_event_is_not_a_conflict() {
        let f = setup().await;
        let t = Utc.with_ymd_and_hms(2025, 3, 2, 19, 0, 0).unwrap();
        let a = f.store.insert_event(f.church_id, "Culto de Domingo", t);

        f.service.assign(f.church_id, f.request(a.id, "Baterista")).await.unwrap();
        f.service.assign(f.church_id, f.request(a.id, "Vocal")).await.unwrap();
    }

    #[tokio::test]
    async fn conflict_preview_honours_the_exclusion() {
        let f = setup().await;
        let t = Utc.with_ymd_and_hms(2025, 3, 2, 19, 0, 0).unwrap();
        let a = f.store.insert_event(f.church_id, "Culto de Domingo", t);
        f.service.assign(f.church_id, f.request(a.id, "Baterista")).await.unwrap();

        let found = f.service.check_conflicts(f.church_id, f.user_id, t, None).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].conflict_role, "Baterista");

        assert!(f
            .service
            .check_conflicts(f.church_id, f.user_id, t, Some(a.id))
            .await
            .unwrap()
            .is_empty());
        assert!(f
            .service
            .check_conflicts(f.church_id, f.user_id, t + Duration::minutes(30), None)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn conflict_preview_for_a_person_of_another_church_is_not_found() {
        let f = setup().await;
        let other_church = Uuid::new_v4();
        let outsider = add_person(&f.store, other_church, "Joana").await;
        let t = Utc.with_ymd_and_hms(2025, 3, 2, 19, 0, 0).unwrap();
        let event = f.store.insert_event(other_church, "Culto da Outra", t);
        f.store
            .create_schedule(NewSchedule {
                event_id: event.id,
                ministry_id: Uuid::new_v4(),
                user_id: outsider,
                role: "Vocal".into(),
                notes: None,
            })
            .await
            .unwrap();

        let err = f
            .service
            .check_conflicts(f.church_id, outsider, t, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound));

        // Na própria igreja a escala continua visível
        let own = f.service.check_conflicts(other_church, outsider, t, None).await.unwrap();
        assert_eq!(own.len(), 1);
    }

    #[tokio::test]
    async fn event_from_another_church_is_not_found() {
        let f = setup().await;
        let other = f.store.insert_event(Uuid::new_v4(), "Outra igreja", Utc::now());

        let err = f
            .service
            .assign(f.church_id, f.request(other.id, "Vocal"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn ministry_from_another_church_is_not_found() {
        let f = setup().await;
        let event = f.store.insert_event(f.church_id, "Culto de Domingo", Utc::now());
        let foreign = f.store.insert_ministry(Uuid::new_v4(), "Louvor");

        let mut payload = f.request(event.id, "Vocal");
        payload.ministry_id = foreign.id;
        let err = f.service.assign(f.church_id, payload).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound));
        assert!(f.store.snapshot().schedules.is_empty());
    }

    #[tokio::test]
    async fn person_from_another_church_cannot_be_scheduled() {
        let f = setup().await;
        let event = f.store.insert_event(f.church_id, "Culto de Domingo", Utc::now());
        let outsider = add_person(&f.store, Uuid::new_v4(), "Joana").await;

        let mut payload = f.request(event.id, "Vocal");
        payload.user_id = outsider;
        let err = f.service.assign(f.church_id, payload).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound));
    }
}
