//! End-to-end engine tests over the in-memory fakes
//!
//! Exercises the full ingest pipeline: recording, window evaluation,
//! exemptions, enforcement, idempotency and the cleanup sweeps.

use chrono::{Duration, Utc};

use guard_common::config::RetentionConfig;
use guard_core::error::DomainError;
use guard_core::events::{ActionKind, SecurityEvent};
use guard_core::protection::{Punishment, PunishmentKind, WhitelistEntry, WhitelistScope};
use guard_core::traits::{EventStore, LimitStore, WhitelistStore};
use guard_core::value_objects::Permissions;
use guard_engine::{
    ActionLimiter, EngineError, IngestOutcome, PunishmentExecutor, RetentionSweeper,
    SettingsService,
};

use integration_tests::{
    base_time, bot_member, member, unique_snowflake, GatewayAction, TestWorld,
};

async fn set_limit(world: &TestWorld, kind: ActionKind, count: i32, window_secs: i64) {
    SettingsService::new(world.engine.context())
        .set_limit(world.guild_id, kind, count, Duration::seconds(window_secs))
        .await
        .expect("limit within valid range");
}

// ============================================================================
// Recording and window evaluation
// ============================================================================

#[tokio::test]
async fn events_within_the_limit_are_recorded_without_enforcement() {
    let world = TestWorld::new();
    set_limit(&world, ActionKind::DeleteChannels, 3, 10).await;

    for (i, expected) in [(0, 1), (1, 2), (2, 3)] {
        let outcome = world
            .engine
            .ingest(world.event_at(ActionKind::DeleteChannels, i))
            .await
            .unwrap();
        match outcome {
            IngestOutcome::Recorded { count } => assert_eq!(count, expected),
            other => panic!("expected Recorded, got {other:?}"),
        }
    }

    assert_eq!(world.events.len(), 3);
    assert!(world.gateway.actions().is_empty());
    assert!(world.cases.is_empty());
}

#[tokio::test]
async fn exceeding_the_limit_bans_by_default_and_records_a_case() {
    let world = TestWorld::new();
    set_limit(&world, ActionKind::DeleteChannels, 3, 10).await;

    for i in 0..3 {
        world
            .engine
            .ingest(world.event_at(ActionKind::DeleteChannels, i))
            .await
            .unwrap();
    }

    let outcome = world
        .engine
        .ingest(world.event_at(ActionKind::DeleteChannels, 3))
        .await
        .unwrap();

    let case = match outcome {
        IngestOutcome::Enforced { case } => case.expect("enforcement should produce a case"),
        other => panic!("expected Enforced, got {other:?}"),
    };

    assert_eq!(case.guild_id, world.guild_id);
    assert_eq!(case.case_number, 1);
    assert_eq!(case.target_id, world.actor_id);
    assert_eq!(case.moderator_id, world.bot_id);
    assert_eq!(case.action, PunishmentKind::Ban);
    assert!(case.reason.contains("limit exceeded (4/3)"));

    let actions = world.gateway.actions();
    assert_eq!(actions.len(), 1);
    assert!(matches!(
        &actions[0],
        GatewayAction::Ban { guild_id, user_id, .. }
            if *guild_id == world.guild_id && *user_id == world.actor_id
    ));

    let notices = world.sink.notices();
    assert_eq!(notices.len(), 1);
    let (notified_guild, notice) = &notices[0];
    assert_eq!(*notified_guild, world.guild_id);
    assert_eq!(notice.actor_id, world.actor_id);
    assert_eq!(notice.count, 4);
    assert_eq!(notice.limit, 3);
    assert_eq!(notice.punishment, PunishmentKind::Ban);
    assert_eq!(notice.case_number, 1);
}

#[tokio::test]
async fn window_is_anchored_at_each_events_own_timestamp() {
    let world = TestWorld::new();
    set_limit(&world, ActionKind::DeleteRoles, 2, 10).await;

    world
        .engine
        .ingest(world.event_at(ActionKind::DeleteRoles, 0))
        .await
        .unwrap();
    world
        .engine
        .ingest(world.event_at(ActionKind::DeleteRoles, 5))
        .await
        .unwrap();

    // 20s later the first two events have aged out of [10, 20]
    let outcome = world
        .engine
        .ingest(world.event_at(ActionKind::DeleteRoles, 20))
        .await
        .unwrap();
    match outcome {
        IngestOutcome::Recorded { count } => assert_eq!(count, 1),
        other => panic!("expected Recorded, got {other:?}"),
    }

    // two more inside the new window trip the limit
    world
        .engine
        .ingest(world.event_at(ActionKind::DeleteRoles, 21))
        .await
        .unwrap();
    let outcome = world
        .engine
        .ingest(world.event_at(ActionKind::DeleteRoles, 22))
        .await
        .unwrap();
    assert!(matches!(outcome, IngestOutcome::Enforced { case: Some(_) }));
}

#[tokio::test]
async fn unmonitored_kinds_are_recorded_but_never_evaluated() {
    let world = TestWorld::new();

    for i in 0..50 {
        let outcome = world
            .engine
            .ingest(world.event_at(ActionKind::PruneMembers, i))
            .await
            .unwrap();
        assert!(matches!(outcome, IngestOutcome::Recorded { .. }));
    }

    assert_eq!(world.events.len(), 50);
    assert!(world.gateway.actions().is_empty());
}

#[tokio::test]
async fn limits_are_scoped_per_action_kind() {
    let world = TestWorld::new();
    set_limit(&world, ActionKind::DeleteChannels, 2, 60).await;

    // a burst of a different kind must not count against DeleteChannels
    for i in 0..5 {
        world
            .engine
            .ingest(world.event_at(ActionKind::CreateChannels, i))
            .await
            .unwrap();
    }

    let outcome = world
        .engine
        .ingest(world.event_at(ActionKind::DeleteChannels, 6))
        .await
        .unwrap();
    match outcome {
        IngestOutcome::Recorded { count } => assert_eq!(count, 1),
        other => panic!("expected Recorded, got {other:?}"),
    }
}

#[tokio::test]
async fn action_count_window_ends_at_now() {
    let world = TestWorld::new();

    // events 10s, 30s and 90s old, plus one of a different kind
    for age in [10, 30, 90] {
        let event = SecurityEvent::new(
            world.guild_id,
            world.actor_id,
            ActionKind::DeleteChannels,
            Utc::now() - Duration::seconds(age),
        );
        world.events.record(&event).await.unwrap();
    }
    let other_kind = SecurityEvent::new(
        world.guild_id,
        world.actor_id,
        ActionKind::CreateChannels,
        Utc::now() - Duration::seconds(10),
    );
    world.events.record(&other_kind).await.unwrap();

    let limiter = ActionLimiter::new(world.engine.context());
    let count = limiter
        .action_count(
            world.guild_id,
            world.actor_id,
            ActionKind::DeleteChannels,
            Duration::seconds(60),
        )
        .await
        .unwrap();
    assert_eq!(count, 2, "only events within the last 60s count");

    let count = limiter
        .action_count(
            world.guild_id,
            world.actor_id,
            ActionKind::DeleteChannels,
            Duration::seconds(5),
        )
        .await
        .unwrap();
    assert_eq!(count, 0, "a 5s window holds none of the aged events");
}

#[tokio::test]
async fn recent_actions_returns_newest_first_up_to_limit() {
    let world = TestWorld::new();
    for i in 0..5 {
        world
            .engine
            .ingest(world.event_at(ActionKind::CreateRoles, i))
            .await
            .unwrap();
    }
    // another guild's events must not leak into the listing
    let other_guild = SecurityEvent::new(
        unique_snowflake(),
        world.actor_id,
        ActionKind::CreateRoles,
        Utc::now(),
    );
    world.events.record(&other_guild).await.unwrap();

    let limiter = ActionLimiter::new(world.engine.context());
    let recent = limiter.recent_actions(world.guild_id, 3).await.unwrap();

    assert_eq!(recent.len(), 3);
    assert!(recent.iter().all(|e| e.guild_id == world.guild_id));
    assert!(
        recent.windows(2).all(|w| w[0].occurred_at >= w[1].occurred_at),
        "listing must be newest first"
    );
    // the newest of the five seeded events leads the listing
    let newest = recent[0].occurred_at;
    let all = limiter.recent_actions(world.guild_id, 10).await.unwrap();
    assert_eq!(all.len(), 5);
    assert_eq!(all[0].occurred_at, newest);
}

#[tokio::test]
async fn ingest_rejects_events_missing_identity() {
    let world = TestWorld::new();
    let event = SecurityEvent::new(
        guard_core::value_objects::Snowflake::default(),
        world.actor_id,
        ActionKind::BanMembers,
        Utc::now(),
    );

    let err = world.engine.ingest(event).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
    assert!(world.events.is_empty());
}

// ============================================================================
// Exemptions
// ============================================================================

#[tokio::test]
async fn whitelisted_user_is_exempt_but_still_recorded() {
    let world = TestWorld::new();
    set_limit(&world, ActionKind::KickMembers, 1, 60).await;
    world
        .whitelist
        .add(
            world.guild_id,
            WhitelistEntry::user(world.actor_id, WhitelistScope::Action(ActionKind::KickMembers)),
        )
        .await
        .unwrap();

    world
        .engine
        .ingest(world.event_at(ActionKind::KickMembers, 0))
        .await
        .unwrap();
    let outcome = world
        .engine
        .ingest(world.event_at(ActionKind::KickMembers, 1))
        .await
        .unwrap();

    match outcome {
        IngestOutcome::Exempt { count } => assert_eq!(count, 2),
        other => panic!("expected Exempt, got {other:?}"),
    }
    assert_eq!(world.events.len(), 2);
    assert!(world.gateway.actions().is_empty());
}

#[tokio::test]
async fn whitelist_scope_does_not_leak_to_other_kinds() {
    let world = TestWorld::new();
    set_limit(&world, ActionKind::DeleteChannels, 1, 60).await;
    world
        .whitelist
        .add(
            world.guild_id,
            WhitelistEntry::user(world.actor_id, WhitelistScope::Action(ActionKind::KickMembers)),
        )
        .await
        .unwrap();

    world
        .engine
        .ingest(world.event_at(ActionKind::DeleteChannels, 0))
        .await
        .unwrap();
    let outcome = world
        .engine
        .ingest(world.event_at(ActionKind::DeleteChannels, 1))
        .await
        .unwrap();

    assert!(matches!(outcome, IngestOutcome::Enforced { case: Some(_) }));
}

#[tokio::test]
async fn whitelisted_role_exempts_its_holders() {
    let world = TestWorld::new();
    set_limit(&world, ActionKind::DeleteRoles, 1, 60).await;

    let trusted_role = unique_snowflake();
    let mut actor = member(world.actor_id, 10, Permissions::MANAGE_ROLES);
    actor.role_ids = vec![trusted_role];
    world.gateway.put_member(world.guild_id, actor);

    world
        .whitelist
        .add(
            world.guild_id,
            WhitelistEntry::role(trusted_role, WhitelistScope::All),
        )
        .await
        .unwrap();

    world
        .engine
        .ingest(world.event_at(ActionKind::DeleteRoles, 0))
        .await
        .unwrap();
    let outcome = world
        .engine
        .ingest(world.event_at(ActionKind::DeleteRoles, 1))
        .await
        .unwrap();

    assert!(matches!(outcome, IngestOutcome::Exempt { .. }));
}

#[tokio::test]
async fn administrators_are_implicitly_exempt() {
    let world = TestWorld::new();
    set_limit(&world, ActionKind::BanMembers, 1, 60).await;
    world.gateway.put_member(
        world.guild_id,
        member(world.actor_id, 10, Permissions::ADMINISTRATOR),
    );

    world
        .engine
        .ingest(world.event_at(ActionKind::BanMembers, 0))
        .await
        .unwrap();
    let outcome = world
        .engine
        .ingest(world.event_at(ActionKind::BanMembers, 1))
        .await
        .unwrap();

    assert!(matches!(outcome, IngestOutcome::Exempt { .. }));
    assert!(world.gateway.actions().is_empty());
}

// ============================================================================
// Enforcement preconditions
// ============================================================================

#[tokio::test]
async fn guild_owner_is_never_punished() {
    let world = TestWorld::new();
    let event = SecurityEvent::new(
        world.guild_id,
        world.owner_id,
        ActionKind::DeleteChannels,
        base_time(),
    );

    let executor = PunishmentExecutor::new(world.engine.context());
    let case = executor.execute_punishment(&event, 10, 3).await.unwrap();

    assert!(case.is_none());
    assert!(world.gateway.actions().is_empty());
}

#[tokio::test]
async fn actor_outranking_the_bot_is_not_punished() {
    let world = TestWorld::new();
    world.gateway.put_member(
        world.guild_id,
        member(world.actor_id, 60, Permissions::MANAGE_CHANNELS),
    );

    let event = world.event_at(ActionKind::DeleteChannels, 0);
    let executor = PunishmentExecutor::new(world.engine.context());
    let case = executor.execute_punishment(&event, 4, 3).await.unwrap();

    assert!(case.is_none());
    assert!(world.gateway.actions().is_empty());
}

#[tokio::test]
async fn actor_tied_with_the_bot_is_not_punished() {
    let world = TestWorld::new();
    world.gateway.put_member(
        world.guild_id,
        member(world.actor_id, 50, Permissions::MANAGE_CHANNELS),
    );

    let event = world.event_at(ActionKind::DeleteChannels, 0);
    let executor = PunishmentExecutor::new(world.engine.context());
    let case = executor.execute_punishment(&event, 4, 3).await.unwrap();

    assert!(case.is_none());
    assert!(world.gateway.actions().is_empty());
}

#[tokio::test]
async fn missing_bot_permission_aborts_enforcement() {
    let world = TestWorld::new();
    world.gateway.put_member(
        world.guild_id,
        member(world.bot_id, 50, Permissions::VIEW_AUDIT_LOG),
    );
    set_limit(&world, ActionKind::DeleteChannels, 1, 60).await;

    world
        .engine
        .ingest(world.event_at(ActionKind::DeleteChannels, 0))
        .await
        .unwrap();
    let outcome = world
        .engine
        .ingest(world.event_at(ActionKind::DeleteChannels, 1))
        .await
        .unwrap();

    assert!(matches!(outcome, IngestOutcome::Enforced { case: None }));
    assert!(world.gateway.actions().is_empty());
    assert!(world.cases.is_empty());
}

#[tokio::test]
async fn actor_who_already_left_is_skipped() {
    let world = TestWorld::new();
    set_limit(&world, ActionKind::DeleteChannels, 1, 60).await;

    let ghost = unique_snowflake();
    for i in 0..2 {
        let event = SecurityEvent::new(
            world.guild_id,
            ghost,
            ActionKind::DeleteChannels,
            base_time() + Duration::seconds(i),
        );
        let outcome = world.engine.ingest(event).await.unwrap();
        if i == 1 {
            assert!(matches!(outcome, IngestOutcome::Enforced { case: None }));
        }
    }

    assert!(world.gateway.actions().is_empty());
}

// ============================================================================
// Idempotency and failure handling
// ============================================================================

#[tokio::test]
async fn concurrent_enforcement_punishes_exactly_once() {
    let world = TestWorld::new();
    let gate = world.gateway.install_apply_gate();
    let event = world.event_at(ActionKind::BanMembers, 0);

    let ctx_a = world.engine.context().clone();
    let event_a = event.clone();
    let first = tokio::spawn(async move {
        PunishmentExecutor::new(&ctx_a)
            .execute_punishment(&event_a, 5, 3)
            .await
    });

    // let the first enforcement reach the gated platform call
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert!(world
        .engine
        .context()
        .locks()
        .is_locked(world.guild_id, world.actor_id));

    let second = PunishmentExecutor::new(world.engine.context())
        .execute_punishment(&event, 5, 3)
        .await
        .unwrap();
    assert!(second.is_none(), "second enforcement must be a no-op");

    gate.notify_one();
    let first = first.await.unwrap().unwrap();
    assert!(first.is_some(), "first enforcement must complete");

    assert_eq!(world.gateway.actions().len(), 1);
    assert_eq!(world.cases.len(), 1);
    assert!(!world
        .engine
        .context()
        .locks()
        .is_locked(world.guild_id, world.actor_id));
}

#[tokio::test]
async fn platform_failure_releases_the_lock_for_retry() {
    let world = TestWorld::new();
    world.gateway.fail_moderation(true);

    let event = world.event_at(ActionKind::DeleteChannels, 0);
    let executor = PunishmentExecutor::new(world.engine.context());

    let case = executor.execute_punishment(&event, 4, 3).await.unwrap();
    assert!(case.is_none());
    assert!(world.cases.is_empty());
    assert!(!world
        .engine
        .context()
        .locks()
        .is_locked(world.guild_id, world.actor_id));

    // the platform recovers; the next attempt goes through
    world.gateway.fail_moderation(false);
    let case = executor.execute_punishment(&event, 4, 3).await.unwrap();
    assert!(case.is_some());
}

#[tokio::test]
async fn case_record_failure_does_not_undo_the_punishment() {
    let world = TestWorld::new();
    world.cases.fail_creates(true);
    set_limit(&world, ActionKind::DeleteChannels, 1, 60).await;

    world
        .engine
        .ingest(world.event_at(ActionKind::DeleteChannels, 0))
        .await
        .unwrap();
    let outcome = world
        .engine
        .ingest(world.event_at(ActionKind::DeleteChannels, 1))
        .await
        .unwrap();

    assert!(matches!(outcome, IngestOutcome::Enforced { case: None }));
    // the ban stands even though the ledger write failed
    assert_eq!(world.gateway.actions().len(), 1);
    assert!(world.sink.is_empty());
}

#[tokio::test]
async fn notification_failure_does_not_fail_enforcement() {
    let world = TestWorld::new();
    world.sink.fail_deliveries(true);
    set_limit(&world, ActionKind::DeleteChannels, 1, 60).await;

    world
        .engine
        .ingest(world.event_at(ActionKind::DeleteChannels, 0))
        .await
        .unwrap();
    let outcome = world
        .engine
        .ingest(world.event_at(ActionKind::DeleteChannels, 1))
        .await
        .unwrap();

    assert!(matches!(outcome, IngestOutcome::Enforced { case: Some(_) }));
    assert_eq!(world.cases.len(), 1);
}

// ============================================================================
// Punishment selection
// ============================================================================

#[tokio::test]
async fn configured_timeout_uses_its_duration() {
    let world = TestWorld::new();
    set_limit(&world, ActionKind::CreateChannels, 1, 60).await;
    SettingsService::new(world.engine.context())
        .set_punishment(
            world.guild_id,
            ActionKind::CreateChannels,
            PunishmentKind::Timeout,
            Some(120),
        )
        .await
        .unwrap();

    world
        .engine
        .ingest(world.event_at(ActionKind::CreateChannels, 0))
        .await
        .unwrap();
    let outcome = world
        .engine
        .ingest(world.event_at(ActionKind::CreateChannels, 1))
        .await
        .unwrap();

    let case = match outcome {
        IngestOutcome::Enforced { case } => case.expect("timeout should produce a case"),
        other => panic!("expected Enforced, got {other:?}"),
    };
    assert_eq!(case.action, PunishmentKind::Timeout);

    let actions = world.gateway.actions();
    assert_eq!(actions.len(), 1);
    match &actions[0] {
        GatewayAction::Timeout { user_id, until, .. } => {
            assert_eq!(*user_id, world.actor_id);
            let remaining = (*until - Utc::now()).num_seconds();
            assert!((100..=120).contains(&remaining), "remaining = {remaining}s");
        }
        other => panic!("expected Timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn stored_timeout_without_duration_falls_back_to_default() {
    let world = TestWorld::new();
    // bypasses settings validation, as a row written before it existed would
    world
        .limits
        .set_punishment(
            world.guild_id,
            ActionKind::KickMembers,
            Punishment::new(PunishmentKind::Timeout, None),
        )
        .await
        .unwrap();

    let event = world.event_at(ActionKind::KickMembers, 0);
    PunishmentExecutor::new(world.engine.context())
        .execute_punishment(&event, 4, 3)
        .await
        .unwrap()
        .expect("enforcement should complete");

    match &world.gateway.actions()[0] {
        GatewayAction::Timeout { until, .. } => {
            let remaining = (*until - Utc::now()).num_seconds();
            assert!((580..=600).contains(&remaining), "remaining = {remaining}s");
        }
        other => panic!("expected Timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn configured_kick_is_applied() {
    let world = TestWorld::new();
    set_limit(&world, ActionKind::DeleteRoles, 1, 60).await;
    SettingsService::new(world.engine.context())
        .set_punishment(world.guild_id, ActionKind::DeleteRoles, PunishmentKind::Kick, None)
        .await
        .unwrap();

    world
        .engine
        .ingest(world.event_at(ActionKind::DeleteRoles, 0))
        .await
        .unwrap();
    world
        .engine
        .ingest(world.event_at(ActionKind::DeleteRoles, 1))
        .await
        .unwrap();

    assert!(matches!(
        &world.gateway.actions()[0],
        GatewayAction::Kick { user_id, .. } if *user_id == world.actor_id
    ));
}

// ============================================================================
// Cleanup sweeps
// ============================================================================

#[tokio::test]
async fn bot_flood_enforcement_kicks_recently_added_bots() {
    let world = TestWorld::new();
    set_limit(&world, ActionKind::AddBots, 1, 60).await;

    let recent_bot = unique_snowflake();
    let old_bot = unique_snowflake();
    world
        .gateway
        .put_member(world.guild_id, bot_member(recent_bot, Duration::minutes(1)));
    world
        .gateway
        .put_member(world.guild_id, bot_member(old_bot, Duration::days(2)));

    world
        .engine
        .ingest(world.event_at(ActionKind::AddBots, 0))
        .await
        .unwrap();
    let outcome = world
        .engine
        .ingest(world.event_at(ActionKind::AddBots, 1))
        .await
        .unwrap();
    assert!(matches!(outcome, IngestOutcome::Enforced { case: Some(_) }));

    let actions = world.gateway.actions();
    assert!(actions
        .iter()
        .any(|a| matches!(a, GatewayAction::Ban { user_id, .. } if *user_id == world.actor_id)));
    assert!(actions
        .iter()
        .any(|a| matches!(a, GatewayAction::Kick { user_id, .. } if *user_id == recent_bot)));
    assert!(!actions
        .iter()
        .any(|a| matches!(a, GatewayAction::Kick { user_id, .. } if *user_id == old_bot)));
}

#[tokio::test]
async fn recent_bot_kick_skips_humans_self_and_exempted() {
    let world = TestWorld::new();
    let recent_bot = unique_snowflake();
    let spared_bot = unique_snowflake();
    let recent_human = unique_snowflake();
    world
        .gateway
        .put_member(world.guild_id, bot_member(recent_bot, Duration::minutes(1)));
    world
        .gateway
        .put_member(world.guild_id, bot_member(spared_bot, Duration::minutes(2)));
    let mut human = member(recent_human, 0, Permissions::empty());
    human.joined_at = Utc::now() - Duration::minutes(1);
    world.gateway.put_member(world.guild_id, human);

    let kicked = PunishmentExecutor::new(world.engine.context())
        .kick_recent_bots(world.guild_id, Some(spared_bot))
        .await
        .unwrap();

    assert_eq!(kicked, 1);
    let actions = world.gateway.actions();
    assert_eq!(actions.len(), 1);
    assert!(matches!(
        &actions[0],
        GatewayAction::Kick { user_id, .. } if *user_id == recent_bot
    ));
}

#[tokio::test]
async fn admin_grant_enforcement_strips_dangerous_roles_from_target() {
    let world = TestWorld::new();
    set_limit(&world, ActionKind::GiveAdminRole, 1, 60).await;

    let target = unique_snowflake();
    let admin_role = unique_snowflake();
    let benign_role = unique_snowflake();
    let mut target_member = member(target, 5, Permissions::empty());
    target_member.role_ids = vec![admin_role, benign_role];
    world.gateway.put_member(world.guild_id, target_member);
    world
        .gateway
        .put_role_permissions(world.guild_id, admin_role, Permissions::ADMINISTRATOR);
    world
        .gateway
        .put_role_permissions(world.guild_id, benign_role, Permissions::KICK_MEMBERS);

    let first = SecurityEvent::new(
        world.guild_id,
        world.actor_id,
        ActionKind::GiveAdminRole,
        base_time(),
    )
    .with_target(target);
    let second = SecurityEvent::new(
        world.guild_id,
        world.actor_id,
        ActionKind::GiveAdminRole,
        base_time() + Duration::seconds(1),
    )
    .with_target(target);

    world.engine.ingest(first).await.unwrap();
    let outcome = world.engine.ingest(second).await.unwrap();
    assert!(matches!(outcome, IngestOutcome::Enforced { case: Some(_) }));

    let removals: Vec<_> = world
        .gateway
        .actions()
        .into_iter()
        .filter_map(|a| match a {
            GatewayAction::RemoveRole { user_id, role_id, .. } => Some((user_id, role_id)),
            _ => None,
        })
        .collect();
    assert_eq!(removals, vec![(target, admin_role)]);
}

// ============================================================================
// Settings validation
// ============================================================================

#[tokio::test]
async fn limit_settings_reject_out_of_range_values() {
    let world = TestWorld::new();
    let settings = SettingsService::new(world.engine.context());
    let kind = ActionKind::BanMembers;

    for bad_count in [0, -1, 101] {
        let err = settings
            .set_limit(world.guild_id, kind, bad_count, Duration::seconds(10))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Domain(DomainError::LimitOutOfRange(_))
        ));
    }

    for bad_window in [0, 3601] {
        let err = settings
            .set_limit(world.guild_id, kind, 5, Duration::seconds(bad_window))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Domain(DomainError::WindowOutOfRange(_))
        ));
    }
}

#[tokio::test]
async fn punishment_settings_validate_durations() {
    let world = TestWorld::new();
    let settings = SettingsService::new(world.engine.context());
    let kind = ActionKind::BanMembers;

    let err = settings
        .set_punishment(world.guild_id, kind, PunishmentKind::Timeout, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Domain(DomainError::TimeoutDurationRequired)
    ));

    let err = settings
        .set_punishment(world.guild_id, kind, PunishmentKind::Timeout, Some(0))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Domain(DomainError::ValidationError(_))
    ));

    let err = settings
        .set_punishment(world.guild_id, kind, PunishmentKind::Ban, Some(60))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Domain(DomainError::ValidationError(_))
    ));
}

#[tokio::test]
async fn clearing_a_limit_makes_the_kind_unmonitored_again() {
    let world = TestWorld::new();
    let settings = SettingsService::new(world.engine.context());
    set_limit(&world, ActionKind::DeleteChannels, 1, 60).await;

    assert!(settings
        .clear_limit(world.guild_id, ActionKind::DeleteChannels)
        .await
        .unwrap());
    assert!(!settings
        .clear_limit(world.guild_id, ActionKind::DeleteChannels)
        .await
        .unwrap());

    for i in 0..5 {
        let outcome = world
            .engine
            .ingest(world.event_at(ActionKind::DeleteChannels, i))
            .await
            .unwrap();
        assert!(matches!(outcome, IngestOutcome::Recorded { .. }));
    }
}

// ============================================================================
// Retention
// ============================================================================

#[tokio::test]
async fn retention_sweep_deletes_only_aged_events() {
    let world = TestWorld::new();

    let old = SecurityEvent::new(
        world.guild_id,
        world.actor_id,
        ActionKind::DeleteChannels,
        Utc::now() - Duration::days(40),
    );
    world.events.record(&old).await.unwrap();
    world
        .engine
        .ingest(world.event_at(ActionKind::DeleteChannels, 0))
        .await
        .unwrap();

    let sweeper = RetentionSweeper::new(
        world.engine.context().clone(),
        RetentionConfig {
            retention_days: 30,
            sweep_interval_seconds: 3600,
        },
    );

    assert_eq!(sweeper.run_once().await.unwrap(), 1);
    assert_eq!(world.events.len(), 1);
    assert_eq!(sweeper.run_once().await.unwrap(), 0);
}

#[tokio::test]
async fn duplicate_source_events_are_recorded_once() {
    let world = TestWorld::new();
    let source = unique_snowflake();

    let event = world
        .event_at(ActionKind::DeleteChannels, 0)
        .with_source(source);
    world.events.record(&event).await.unwrap();
    world.events.record(&event).await.unwrap();

    assert_eq!(world.events.len(), 1);
}
