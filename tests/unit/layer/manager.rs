use super::*;

fn split_mix(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn pos(m: &LayerManager, id: LayerId) -> u32 {
    m.order_of(id).unwrap()
}

#[test]
fn unconstrained_layers_keep_creation_order_between_sentinels() {
    let mut m = LayerManager::new();
    let a = m.new_layer("a").unwrap();
    let b = m.new_layer("b").unwrap();
    let c = m.new_layer("c").unwrap();
    assert_eq!(
        m.resolved_order(),
        vec![m.default_layer(), a, b, c, m.top_layer()]
    );
}

#[test]
fn constraints_reorder_layers() {
    let mut m = LayerManager::new();
    let a = m.new_layer("a").unwrap();
    let b = m.new_layer("b").unwrap();
    let c = m.new_layer("c").unwrap();
    assert!(m.require_above(a, c).unwrap());
    assert!(m.require_below(b, c).unwrap());
    assert_eq!(
        m.resolved_order(),
        vec![m.default_layer(), b, c, a, m.top_layer()]
    );
    assert_eq!(m.above_of(a), vec![c]);
    assert_eq!(m.below_of(b), vec![c]);
}

#[test]
fn cycle_closing_constraint_is_dropped() {
    let mut m = LayerManager::new();
    let a = m.new_layer("a").unwrap();
    let b = m.new_layer("b").unwrap();
    let c = m.new_layer("c").unwrap();
    assert!(m.require_above(a, b).unwrap());
    assert!(m.require_above(b, c).unwrap());
    let before = m.resolved_order();

    assert!(!m.require_above(c, a).unwrap());
    assert_eq!(m.resolved_order(), before);
    assert!(pos(&m, b) < pos(&m, a));
    assert!(pos(&m, c) < pos(&m, b));
    // Self edges are rejected too.
    assert!(!m.require_below(a, a).unwrap());
}

#[test]
fn sentinels_are_pinned() {
    let mut m = LayerManager::new();
    let a = m.new_layer("a").unwrap();
    let b = m.new_layer("b").unwrap();
    assert!(!m.require_below(a, m.default_layer()).unwrap());
    assert!(!m.require_above(b, m.top_layer()).unwrap());
    assert!(!m.require_above(m.default_layer(), a).unwrap());
    assert_eq!(pos(&m, m.default_layer()), 0);
    assert_eq!(pos(&m, m.top_layer()), 3);
}

#[test]
fn duplicate_names_and_foreign_ids_are_rejected() {
    let mut m = LayerManager::new();
    m.new_layer("ui").unwrap();
    assert!(m.new_layer("ui").is_err());
    assert!(m.new_layer("default").is_err());
    assert!(m.order_of(LayerId(99)).is_err());
    assert!(m.require_above(LayerId(99), LayerId(2)).is_err());
    assert_eq!(m.layer("ui"), Some(LayerId(2)));
    assert_eq!(m.name(LayerId(2)), Some("ui"));
}

#[test]
fn order_is_resolved_lazily_and_cached() {
    let mut m = LayerManager::new();
    let a = m.new_layer("a").unwrap();
    let b = m.new_layer("b").unwrap();
    assert!(m.order.borrow().is_none());
    m.require_above(a, b).unwrap();
    assert!(m.order.borrow().is_none());
    assert_eq!(pos(&m, b), 1);
    assert!(m.order.borrow().is_some());
    // Re-adding an existing constraint does not invalidate.
    assert!(m.require_above(a, b).unwrap());
    assert!(m.order.borrow().is_some());
}

#[test]
fn random_constraint_sets_resolve_to_valid_topological_orders() {
    let mut rng = 0xDEAD_BEEFu64;
    for _round in 0..50 {
        let mut m = LayerManager::new();
        let count = 2 + (split_mix(&mut rng) % 12) as usize;
        let ids: Vec<LayerId> = (0..count)
            .map(|i| m.new_layer(&format!("l{i}")).unwrap())
            .collect();

        let mut recorded = Vec::new();
        for _ in 0..count * 2 {
            let a = ids[(split_mix(&mut rng) % count as u64) as usize];
            let b = ids[(split_mix(&mut rng) % count as u64) as usize];
            let above = split_mix(&mut rng) % 2 == 0;
            let ok = if above {
                m.require_above(a, b).unwrap()
            } else {
                m.require_below(a, b).unwrap()
            };
            if ok {
                // (lower, upper)
                recorded.push(if above { (b, a) } else { (a, b) });
            }
        }

        let default_pos = pos(&m, m.default_layer());
        let top_pos = pos(&m, m.top_layer());
        for &id in &ids {
            assert!(default_pos < pos(&m, id));
            assert!(pos(&m, id) < top_pos);
        }
        for (lower, upper) in recorded {
            assert!(pos(&m, lower) < pos(&m, upper));
        }
    }
}
