//! UseCase: Room への参加
//!
//! 未知の room id なら Room を作ってから参加させ、新規参加者に返すための
//! 全量スナップショットと、`user_joined` の通知対象を返します。
//! 参加の成功はその Room の破棄予約のキャンセルを兼ねます（Registry 側で
//! 実行）。

use std::sync::Arc;

use crate::domain::{Participant, RoomId, RoomRegistry, RoomSnapshot};

use super::error::JoinRoomError;

/// Room 参加のユースケース
pub struct JoinRoomUseCase {
    registry: Arc<dyn RoomRegistry>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// Room 参加を実行
    ///
    /// # Returns
    ///
    /// * `Ok(RoomSnapshot)` - 参加成功。`init` の材料と通知対象
    /// * `Err(JoinRoomError)` - 参加失敗（Room の状態は変更されない）
    pub async fn execute(
        &self,
        room_id: RoomId,
        participant: Participant,
    ) -> Result<RoomSnapshot, JoinRoomError> {
        let user_id = participant.id.as_str().to_string();
        let snapshot = self.registry.join(room_id.clone(), participant).await?;
        tracing::info!(
            "User '{}' joined room '{}' ({} users now)",
            user_id,
            room_id.as_str(),
            snapshot.participants.len()
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Color, ConnectionId, RegistryError, Timestamp, UserId, UserName,
    };
    use crate::infrastructure::repository::{DEFAULT_GRACE_PERIOD, InMemoryRoomRegistry};

    fn participant(user_id: &str) -> Participant {
        Participant::new(
            ConnectionId::generate(),
            UserId::new(user_id.to_string()).unwrap(),
            UserName::new(user_id.to_string()).unwrap(),
            Color::default(),
            Timestamp::new(1000),
        )
    }

    #[tokio::test]
    async fn test_join_room_success() {
        // テスト項目: 新規参加者が正常に join できる
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new(DEFAULT_GRACE_PERIOD));
        let usecase = JoinRoomUseCase::new(registry.clone());

        // when (操作):
        let result = usecase
            .execute(RoomId::new("r1".to_string()).unwrap(), participant("alice"))
            .await;

        // then (期待する結果):
        let snapshot = result.unwrap();
        assert_eq!(snapshot.participants.len(), 1);
        assert!(snapshot.notify_targets.is_empty());
        assert_eq!(registry.room_count().await, 1);
    }

    #[tokio::test]
    async fn test_join_room_duplicate_user_id_error() {
        // テスト項目: 重複した user id での join がエラーになる
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new(DEFAULT_GRACE_PERIOD));
        let usecase = JoinRoomUseCase::new(registry.clone());
        usecase
            .execute(RoomId::new("r1".to_string()).unwrap(), participant("alice"))
            .await
            .unwrap();

        // when (操作): 同じ user id で再度 join を試みる
        let result = usecase
            .execute(RoomId::new("r1".to_string()).unwrap(), participant("alice"))
            .await;

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            JoinRoomError::DuplicateUserId("alice".to_string())
        );
        assert_eq!(registry.participant_count().await, 1);
    }

    #[tokio::test]
    async fn test_join_room_second_participant_gets_notify_targets() {
        // テスト項目: 2 人目の join で 1 人目が通知対象になる
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new(DEFAULT_GRACE_PERIOD));
        let usecase = JoinRoomUseCase::new(registry);
        let alice = participant("alice");
        let alice_conn = alice.conn.clone();
        usecase
            .execute(RoomId::new("r1".to_string()).unwrap(), alice)
            .await
            .unwrap();

        // when (操作):
        let snapshot = usecase
            .execute(RoomId::new("r1".to_string()).unwrap(), participant("bob"))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(snapshot.participants.len(), 2);
        assert_eq!(snapshot.notify_targets, vec![alice_conn]);
    }

    #[tokio::test]
    async fn test_join_room_maps_registry_error() {
        // テスト項目: Registry の重複エラーが JoinRoomError に写像される
        // given (前提条件):
        let mut registry = crate::domain::MockRoomRegistry::new();
        registry.expect_join().returning(|_, _| {
            Err(RegistryError::DuplicateUserId("alice".to_string()))
        });
        let usecase = JoinRoomUseCase::new(Arc::new(registry));

        // when (操作):
        let result = usecase
            .execute(RoomId::new("r1".to_string()).unwrap(), participant("alice"))
            .await;

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            JoinRoomError::DuplicateUserId("alice".to_string())
        );
    }
}
