use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sigwave::{
    Add, Adsr, Level, Multiply, Noise, Pulse, Reflect, Signal, SignalExt, Sine, Stack, Step,
    Time, Trigger, UNIT_LEVEL, UNIT_TIME,
};

fn random_levels(rng: &mut StdRng, count: usize) -> Vec<Box<dyn Signal>> {
    (0..count)
        .map(|_| rng.gen_range(-UNIT_LEVEL..=UNIT_LEVEL).boxed())
        .collect()
}

#[test]
fn test_multiply_identity_and_annihilator() {
    let mut rng = StdRng::seed_from_u64(11);
    for n in 1..8 {
        let all_full: Multiply = (0..n).map(|_| UNIT_LEVEL.boxed()).collect();
        assert_eq!(all_full.level(0), UNIT_LEVEL);

        let mut children = random_levels(&mut rng, n);
        children.insert(rng.gen_range(0..=n), (0 as Level).boxed());
        assert_eq!(Multiply::new(children).level(0), 0);
    }
}

#[test]
fn test_stack_stays_in_range() {
    let mut rng = StdRng::seed_from_u64(12);
    for n in 1..12 {
        for _ in 0..50 {
            let stack = Stack::new(random_levels(&mut rng, n));
            let level = stack.level(0);
            assert!((-UNIT_LEVEL..=UNIT_LEVEL).contains(&level));
        }
        let saturated: Stack = (0..n).map(|_| UNIT_LEVEL.boxed()).collect();
        assert!(saturated.level(0) > UNIT_LEVEL - n as Level);
    }
}

#[test]
fn test_bounds_of_combinators() {
    let children = || -> Vec<Box<dyn Signal>> {
        vec![
            Sine::new(UNIT_TIME).boxed(),
            Pulse::new(3 * UNIT_TIME).boxed(),
            Adsr::new(UNIT_TIME, UNIT_TIME, 0, UNIT_LEVEL / 2, UNIT_TIME).boxed(),
        ]
    };
    assert_eq!(Multiply::new(children()).max_x(), Some(3 * UNIT_TIME));
    assert_eq!(Add::new(children()).max_x(), Some(3 * UNIT_TIME));

    let short = || -> Vec<Box<dyn Signal>> {
        vec![Pulse::new(UNIT_TIME).boxed(), Pulse::new(2 * UNIT_TIME).boxed()]
    };
    assert_eq!(Multiply::new(short()).max_x(), Some(UNIT_TIME));
    assert_eq!(Stack::new(short()).max_x(), Some(2 * UNIT_TIME));
    assert_eq!(Add::new(vec![Step.boxed()]).max_x(), None);
}

#[test]
fn test_loop_repeats_for_any_shift() {
    let length = UNIT_TIME / 3;
    let looped = Noise::with_step(4, UNIT_TIME / 100).looped(length);
    let mut rng = StdRng::seed_from_u64(13);
    for _ in 0..200 {
        let t: Time = rng.gen_range(-10 * UNIT_TIME..10 * UNIT_TIME);
        let k: Time = rng.gen_range(-20..20);
        assert_eq!(looped.level(t), looped.level(t + k * length));
    }
}

#[test]
fn test_reflect_twice_is_identity_inside_range() {
    let mut rng = StdRng::seed_from_u64(14);
    for _ in 0..500 {
        let v: Level = rng.gen_range(-UNIT_LEVEL + 1..UNIT_LEVEL);
        if v == 0 {
            continue;
        }
        assert_eq!(Reflect::new(Reflect::new(v)).level(0), v);
    }
}

#[test]
fn test_trigger_finds_known_crossing() {
    // The ramp rises through a quarter of full scale at exactly 0.25 units.
    let ramp = Adsr::new(UNIT_TIME, 0, 0, UNIT_LEVEL, UNIT_TIME);
    let resolution = UNIT_TIME / 1000;
    let trigger = Trigger::new(ramp, UNIT_LEVEL / 4, true, resolution, 2 * UNIT_TIME);
    let first = trigger.level(0);
    let crossing = trigger.cached_delay();
    assert_eq!(first, ramp.level(crossing));
    assert!(ramp.level(crossing) > UNIT_LEVEL / 4);
    assert!(ramp.level(crossing - resolution) <= UNIT_LEVEL / 4);
    assert!((crossing - UNIT_TIME / 4).abs() <= resolution);
}
