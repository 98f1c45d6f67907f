// ==========================================
// ItemApi 集成测试
// ==========================================
// 测试范围:
// 1. 新增: 派生天数、必填校验、日期格式
// 2. 开封: min 规则、原始到期日只写一次、重复开封拒绝、非法天数忽略
// 3. 移除: 只移除匹配条目
// 4. 列表排序与汇总计数
// ==========================================

mod helpers;

use best_before_tracker::api::{ApiError, OpenResult};
use best_before_tracker::domain::{StorageLocation, TrackedItem};
use best_before_tracker::engine::ItemEventType;
use helpers::form_builder::FormBuilder;
use test_helpers::*;

fn add(env: &mut TestEnv, name: &str, offset: i64) -> TrackedItem {
    env.api
        .add_from_form(&FormBuilder::new(name, &day_text(offset)).build())
        .expect("新增失败")
}

// ==========================================
// 新增
// ==========================================

#[test]
fn test_add_牛奶两天后到期() {
    let mut env = TestEnv::new();
    let milk = env
        .api
        .add_from_form(
            &FormBuilder::new("Milk", &day_text(2))
                .category("Dairy")
                .location(StorageLocation::Fridge)
                .barcode("4006381333931")
                .build(),
        )
        .unwrap();

    assert_eq!(milk.days_until_expiry(), 2);
    assert_eq!(milk.added_date(), today());
    assert_eq!(milk.original_expiry_date(), None);
    assert_eq!(milk.barcode(), Some("4006381333931"));
}

#[test]
fn test_add_当天与已过期() {
    let mut env = TestEnv::new();
    assert_eq!(add(&mut env, "Cheese", 0).days_until_expiry(), 0);
    assert_eq!(add(&mut env, "Ham", -2).days_until_expiry(), -2);
}

#[test]
fn test_add_缺少必填项不创建条目() {
    let mut env = TestEnv::new();

    let result = env.api.add_from_form(&FormBuilder::new("", &day_text(2)).build());
    assert!(matches!(result, Err(ApiError::ValidationError(_))));

    let result = env.api.add_from_form(&FormBuilder::new("Milk", "").build());
    assert!(matches!(result, Err(ApiError::ValidationError(_))));

    assert!(env.api.is_empty());
    assert!(env.recorder.events().is_empty());
}

#[test]
fn test_add_日期格式错误被拒绝() {
    let mut env = TestEnv::new();
    for input in ["2024/07/03", "July 3rd", "2024-7-3", "2024-02-30"] {
        let result = env.api.add_from_form(&FormBuilder::new("Milk", input).build());
        assert!(
            matches!(result, Err(ApiError::InvalidInput(_))),
            "{} 应被拒绝",
            input
        );
    }
    assert!(env.api.is_empty());
}

#[test]
fn test_add_空分类使用默认值() {
    let mut env = TestEnv::new();
    assert_eq!(add(&mut env, "Rice", 30).category(), "Other");
}

// ==========================================
// 开封
// ==========================================

#[test]
fn test_open_原到期更早时保持不变() {
    let mut env = TestEnv::new();
    let milk = add(&mut env, "Milk", 2);

    let result = env.api.open_item(milk.id(), "7").unwrap();
    let OpenResult::Opened {
        item,
        previous_expiry,
    } = result
    else {
        panic!("应开封成功");
    };

    assert_eq!(previous_expiry, day(2));
    assert_eq!(item.expiry_date(), day(2));
    assert_eq!(item.days_until_expiry(), 2);
    assert_eq!(item.original_expiry_date(), Some(day(2)));
    assert_eq!(item.opened_date(), Some(today()));
    assert_eq!(item.use_within_days(), Some(7));
}

#[test]
fn test_open_开封后缩短有效期() {
    let mut env = TestEnv::new();
    let jam = add(&mut env, "Jam", 10);

    env.api.open_item(jam.id(), "3").unwrap();
    let jam = env.api.get(jam.id()).unwrap();

    assert_eq!(jam.expiry_date(), day(3));
    assert_eq!(jam.days_until_expiry(), 3);
    assert_eq!(jam.original_expiry_date(), Some(day(10)));
}

#[test]
fn test_open_重复开封不改变任何字段() {
    let mut env = TestEnv::new();
    let jam = add(&mut env, "Jam", 10);
    env.api.open_item(jam.id(), "3").unwrap();
    let before = env.api.get(jam.id()).unwrap();

    for input in ["1", "30", "0", "abc"] {
        match env.api.open_item(jam.id(), input) {
            Err(ApiError::AlreadyOpened { opened_date, .. }) => assert_eq!(opened_date, today()),
            other => panic!("Expected AlreadyOpened, got {:?}", other),
        }
    }

    assert_eq!(env.api.get(jam.id()).unwrap(), before);
    assert_eq!(before.original_expiry_date(), Some(day(10)));
}

#[test]
fn test_open_非法天数静默忽略() {
    let mut env = TestEnv::new();
    let jam = add(&mut env, "Jam", 10);
    let before = env.api.get(jam.id()).unwrap();

    for input in ["0", "-3", "", "  ", "2.5", "seven", "3days"] {
        assert_eq!(env.api.open_item(jam.id(), input).unwrap(), OpenResult::Ignored);
    }

    assert_eq!(env.api.get(jam.id()).unwrap(), before);
    let opened = env
        .recorder
        .events()
        .iter()
        .filter(|e| e.event_type == ItemEventType::Opened)
        .count();
    assert_eq!(opened, 0);
}

#[test]
fn test_open_有效期不晚于原到期日() {
    for offset in [-3, 0, 1, 5, 20] {
        for within in 1..=10u32 {
            let mut env = TestEnv::new();
            let item = add(&mut env, "Item", offset);
            env.api.open_item(item.id(), &within.to_string()).unwrap();
            let opened = env.api.get(item.id()).unwrap();

            let expected = day(within as i64).min(day(offset));
            assert_eq!(opened.expiry_date(), expected);
            assert!(opened.expiry_date() <= day(offset));
        }
    }
}

#[test]
fn test_open_开封日期取操作当天() {
    let mut env = TestEnv::new();
    let sauce = add(&mut env, "Sauce", 60);

    env.clock.advance_days(5);
    env.api.open_item(sauce.id(), "14").unwrap();
    let sauce = env.api.get(sauce.id()).unwrap();

    assert_eq!(sauce.opened_date(), Some(day(5)));
    assert_eq!(sauce.expiry_date(), day(19));
    assert_eq!(sauce.days_until_expiry(), 14);
}

// ==========================================
// 移除
// ==========================================

#[test]
fn test_mark_used_只移除匹配条目() {
    let mut env = TestEnv::new();
    let milk = add(&mut env, "Milk", 2);
    let bread = add(&mut env, "Bread", 5);
    let eggs = add(&mut env, "Eggs", 9);

    env.api.mark_used(bread.id()).unwrap();

    let remaining = env.api.list_for_display();
    assert_eq!(remaining, vec![milk, eggs]);
}

#[test]
fn test_mark_used_不存在的id不改变集合() {
    let mut env = TestEnv::new();
    add(&mut env, "Milk", 2);
    let before = env.api.list_for_display();

    assert!(matches!(env.api.mark_used("no-such-id"), Err(ApiError::NotFound(_))));
    assert_eq!(env.api.list_for_display(), before);
}

// ==========================================
// 列表与汇总
// ==========================================

#[test]
fn test_list_按剩余天数升序() {
    let mut env = TestEnv::new();
    add(&mut env, "Bread", 5);
    add(&mut env, "Milk", 2);
    add(&mut env, "Yogurt", -1);

    let names: Vec<String> = env
        .api
        .list_for_display()
        .iter()
        .map(|i| i.name().to_string())
        .collect();
    assert_eq!(names, vec!["Yogurt", "Milk", "Bread"]);
}

#[test]
fn test_summary_实时计数() {
    let mut env = TestEnv::new();
    for (name, offset) in [("A", 5), ("B", 2), ("C", 1), ("D", 0), ("E", -1)] {
        add(&mut env, name, offset);
    }

    let summary = env.api.summary();
    assert_eq!(summary.total, 5);
    assert_eq!(summary.expiring_soon, 3);
    assert_eq!(summary.expired, 1);

    // 两天后: 5→3, 2→0, 1→-1, 0→-2, -1→-3
    env.clock.advance_days(2);
    let summary = env.api.summary();
    assert_eq!(summary.expiring_soon, 4);
    assert_eq!(summary.expired, 3);
}
