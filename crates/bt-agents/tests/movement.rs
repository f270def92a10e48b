use bt_agents::steering::{distance_less_than, within};
use bt_agents::units::meters_to_pixels;
use bt_agents::{AgentSnapshot, Vec2, ZombieBody};
use bt_core::Status;

const DT: f32 = 0.1;
const SPEED: f32 = 100.0;

fn body_at(position: Vec2) -> ZombieBody {
    let mut body = ZombieBody::new(1, "zombie-1", position, SPEED, 0);
    body.senses.dt = DT;
    body
}

#[test]
fn move_to_converges_in_bounded_ticks() {
    let mut body = body_at(Vec2::ZERO);
    body.target = Vec2::new(1000.0, 0.0);
    let radius = 0.5;
    let bound = (1000.0 / (SPEED * DT)).ceil() as u32 + 1;

    let mut ticks = 0;
    loop {
        let before = body.position;
        let status = body.move_to(radius);
        ticks += 1;
        if status == Status::Success {
            assert!(within(body.position, body.target, radius));
            assert!(!within(before, body.target, radius));
            break;
        }
        assert_eq!(status, Status::Running);
        assert!(!within(body.position, body.target, radius));
        assert!(ticks <= bound, "no arrival after {ticks} ticks");
    }
    assert!(ticks >= bound - 3, "arrived too early: {ticks}");
}

#[test]
fn move_to_already_there_succeeds_immediately() {
    let mut body = body_at(Vec2::new(10.0, 10.0));
    body.target = Vec2::new(10.0, 10.0);
    assert_eq!(body.move_to(0.5), Status::Success);
    assert_eq!(body.position, Vec2::new(10.0, 10.0));
}

#[test]
fn large_step_lands_on_target() {
    let mut body = body_at(Vec2::ZERO);
    body.senses.dt = 100.0;
    body.target = Vec2::new(30.0, 40.0);
    assert_eq!(body.move_to(0.0), Status::Success);
    assert_eq!(body.position, Vec2::new(30.0, 40.0));
}

#[test]
fn proximity_is_strictly_less_than() {
    let mut body = body_at(Vec2::ZERO);
    let radius = 7.0;
    let edge = meters_to_pixels(radius);

    for (x, expected) in [(edge - 0.5, true), (edge, false), (edge + 0.5, false)] {
        body.senses.quarry = Some(AgentSnapshot {
            id: 0,
            name: "boy".into(),
            position: Vec2::new(x, 0.0),
            ball_count: 0,
        });
        assert_eq!(body.is_boy_nearby(radius), expected, "x = {x}");
        assert_eq!(distance_less_than(Vec2::ZERO, Vec2::new(x, 0.0), radius), expected);
    }
}

#[test]
fn approach_stops_on_the_quarry() {
    let mut body = body_at(Vec2::ZERO);
    body.senses.quarry = Some(AgentSnapshot {
        id: 0,
        name: "boy".into(),
        position: Vec2::new(50.0, 0.0),
        ball_count: 0,
    });

    let mut statuses = Vec::new();
    for _ in 0..6 {
        statuses.push(body.move_to_boy(0.5));
    }
    // 10 px per tick, 16.7 px tolerance: 40 px is the first position close enough.
    assert_eq!(&statuses[..3], &[Status::Running; 3]);
    assert!(statuses[3..].iter().all(|s| s.is_success()));
    assert!(body.position.distance(Vec2::new(50.0, 0.0)) <= meters_to_pixels(0.5));
}
