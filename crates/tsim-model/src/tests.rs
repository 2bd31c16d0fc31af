//! Unit tests for the domain model.

use crate::{
    Describable, Junction, JunctionPolicy, ModelError, RoadKind, RoadMap, Tick, Vehicle,
    VehicleId, VehicleLocation,
};
use crate::ids::JunctionId;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// j1 → r1 → j2, road length 20, limit 10.
fn line_map() -> RoadMap {
    let mut map = RoadMap::new();
    map.add_junction("j1", JunctionPolicy::RoundRobin).unwrap();
    map.add_junction("j2", JunctionPolicy::RoundRobin).unwrap();
    map.add_road("r1", 20, 10, "j1", "j2", RoadKind::Plain).unwrap();
    map
}

fn itinerary(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// One full model tick, the way the kernel drives it.
fn tick(map: &mut RoadMap) {
    let staged = map.advance_roads();
    map.advance_junctions().unwrap();
    map.enter_junctions(&staged);
}

/// A standalone vehicle for junction-level tests; the itinerary junctions
/// are never dereferenced.
fn stub_vehicle(id: &str) -> Vehicle {
    Vehicle::new(id.to_string(), 10, vec![JunctionId(0), JunctionId(1)])
}

// ── RoadMap construction ──────────────────────────────────────────────────────

mod road_map_tests {
    use super::*;

    #[test]
    fn duplicate_junction_rejected() {
        let mut map = RoadMap::new();
        map.add_junction("j1", JunctionPolicy::RoundRobin).unwrap();
        let err = map.add_junction("j1", JunctionPolicy::MostCrowded).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateJunction(id) if id == "j1"));
    }

    #[test]
    fn duplicate_road_rejected() {
        let mut map = line_map();
        let err = map
            .add_road("r1", 5, 5, "j1", "j2", RoadKind::Plain)
            .unwrap_err();
        assert!(matches!(err, ModelError::DuplicateRoad(_)));
    }

    #[test]
    fn road_with_unknown_junction_rejected() {
        let mut map = line_map();
        let err = map
            .add_road("r2", 5, 5, "j1", "nowhere", RoadKind::Plain)
            .unwrap_err();
        assert!(matches!(err, ModelError::UnknownJunction(id) if id == "nowhere"));
    }

    #[test]
    fn duplicate_vehicle_leaves_first_intact() {
        let mut map = line_map();
        map.add_vehicle("v1", 10, &itinerary(&["j1", "j2"])).unwrap();
        let err = map.add_vehicle("v1", 5, &itinerary(&["j1", "j2"])).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateVehicle(_)));
        assert_eq!(map.vehicles().len(), 1);
        assert_eq!(map.vehicles()[0].max_speed(), 10);
    }

    #[test]
    fn vehicle_with_unknown_itinerary_junction_rejected() {
        let mut map = line_map();
        let err = map.add_vehicle("v1", 10, &itinerary(&["j1", "jx"])).unwrap_err();
        assert!(matches!(err, ModelError::UnknownJunction(id) if id == "jx"));
        assert!(map.vehicles().is_empty());
    }

    #[test]
    fn vehicle_with_short_itinerary_rejected() {
        let mut map = line_map();
        let err = map.add_vehicle("v1", 10, &itinerary(&["j1"])).unwrap_err();
        assert!(matches!(err, ModelError::ShortItinerary(_)));
    }

    #[test]
    fn vehicle_without_connecting_road_rejected() {
        let mut map = line_map();
        // No road j2 → j1.
        let err = map.add_vehicle("v1", 10, &itinerary(&["j2", "j1"])).unwrap_err();
        assert!(matches!(err, ModelError::NoRoadBetween { .. }));
    }

    #[test]
    fn new_vehicle_starts_on_first_road() {
        let mut map = line_map();
        let vid = map.add_vehicle("v1", 10, &itinerary(&["j1", "j2"])).unwrap();
        let v = map.vehicle(vid);
        assert_eq!(v.distance(), 0);
        assert_eq!(v.location(), VehicleLocation::OnRoad(map.road_id("r1").unwrap()));
        assert_eq!(map.road(map.road_id("r1").unwrap()).vehicles(), &[vid]);
    }

    #[test]
    fn later_road_replaces_outgoing_entry() {
        let mut map = line_map();
        map.add_road("r2", 30, 5, "j1", "j2", RoadKind::Plain).unwrap();
        let j1 = map.junction(map.junction_id("j1").unwrap());
        let used = j1.road_to(map.junction_id("j2").unwrap()).unwrap();
        assert_eq!(map.road(used).id(), "r2");
    }

    #[test]
    fn make_faulty_unknown_vehicle_errors() {
        let mut map = line_map();
        let err = map.make_vehicle_faulty("ghost", 3).unwrap_err();
        assert!(matches!(err, ModelError::UnknownVehicle(_)));
    }
}

// ── Road advancement ──────────────────────────────────────────────────────────

mod road_tests {
    use super::*;

    #[test]
    fn speed_is_min_of_limit_and_vehicle_max() {
        let mut map = line_map(); // limit 10
        let slow = map.add_vehicle("slow", 4, &itinerary(&["j1", "j2"])).unwrap();
        let fast = map.add_vehicle("fast", 99, &itinerary(&["j1", "j2"])).unwrap();
        map.advance_roads();
        assert_eq!(map.vehicle(slow).distance(), 4);
        assert_eq!(map.vehicle(fast).distance(), 10);
        assert_eq!(map.vehicle(fast).speed(), 10);
    }

    #[test]
    fn distance_caps_at_length_and_vehicle_arrives_at_queue() {
        let mut map = RoadMap::new();
        map.add_junction("j1", JunctionPolicy::RoundRobin).unwrap();
        map.add_junction("j2", JunctionPolicy::RoundRobin).unwrap();
        map.add_road("r1", 20, 50, "j1", "j2", RoadKind::Plain).unwrap();
        let vid = map.add_vehicle("v1", 30, &itinerary(&["j1", "j2"])).unwrap();
        let staged = map.advance_roads();
        assert_eq!(staged.len(), 1);
        assert_eq!(staged[0].vehicle, vid);
        let v = map.vehicle(vid);
        assert_eq!(v.kilometrage(), 20); // capped, not 30
        assert_eq!(v.speed(), 0);
        assert_eq!(v.location(), VehicleLocation::Waiting(map.junction_id("j2").unwrap()));
        assert!(map.road(map.road_id("r1").unwrap()).vehicles().is_empty());
    }

    #[test]
    fn faulty_vehicle_stops_and_halves_followers() {
        // Lead breaks down at 40; the chaser behind it runs at half
        // speed, including the tick on which the fault expires.
        let mut map = RoadMap::new();
        map.add_junction("j1", JunctionPolicy::RoundRobin).unwrap();
        map.add_junction("j2", JunctionPolicy::RoundRobin).unwrap();
        map.add_road("r1", 100, 20, "j1", "j2", RoadKind::Plain).unwrap();
        let lead = map.add_vehicle("lead", 20, &itinerary(&["j1", "j2"])).unwrap();
        let chaser = map.add_vehicle("chaser", 5, &itinerary(&["j1", "j2"])).unwrap();

        map.advance_roads(); // lead 20, chaser 5
        map.advance_roads(); // lead 40, chaser 10
        map.make_vehicle_faulty("lead", 2).unwrap();

        map.advance_roads(); // lead stuck at 40; chaser halved: 10 → 12
        assert_eq!(map.vehicle(lead).distance(), 40);
        assert_eq!(map.vehicle(lead).speed(), 0);
        assert_eq!(map.vehicle(chaser).distance(), 12);
        assert_eq!(map.vehicle(chaser).speed(), 2);

        // Fault expires this tick but the chaser is still halved for it.
        map.advance_roads();
        assert_eq!(map.vehicle(chaser).distance(), 14);
        assert!(!map.vehicle(lead).is_faulty());

        map.advance_roads(); // both at full speed again
        assert_eq!(map.vehicle(lead).distance(), 60);
        assert_eq!(map.vehicle(chaser).distance(), 19);
        assert_eq!(map.vehicle(chaser).speed(), 5);
    }

    #[test]
    fn vehicle_ahead_of_fault_not_slowed() {
        let mut map = RoadMap::new();
        map.add_junction("j1", JunctionPolicy::RoundRobin).unwrap();
        map.add_junction("j2", JunctionPolicy::RoundRobin).unwrap();
        map.add_road("r1", 100, 10, "j1", "j2", RoadKind::Plain).unwrap();
        let front = map.add_vehicle("front", 10, &itinerary(&["j1", "j2"])).unwrap();
        let back = map.add_vehicle("back", 10, &itinerary(&["j1", "j2"])).unwrap();
        map.advance_roads(); // both at 10
        map.make_vehicle_faulty("back", 5).unwrap();
        // back sits at 10, front at 10: equal distance counts as "ahead",
        // so front is slowed this tick, then pulls clear.
        map.advance_roads();
        assert_eq!(map.vehicle(front).distance(), 15);
        map.advance_roads();
        assert_eq!(map.vehicle(front).speed(), 10);
        assert_eq!(map.vehicle(front).distance(), 25);
        assert_eq!(map.vehicle(back).distance(), 10);
    }

    #[test]
    fn make_faulty_zero_is_a_no_op() {
        let mut map = line_map();
        let vid = map.add_vehicle("v1", 10, &itinerary(&["j1", "j2"])).unwrap();
        map.make_vehicle_faulty("v1", 0).unwrap();
        assert!(!map.vehicle(vid).is_faulty());
        map.advance_roads();
        assert_eq!(map.vehicle(vid).distance(), 10);
    }

    #[test]
    fn lanes_partition_the_fault_slowdown() {
        let mut map = RoadMap::new();
        map.add_junction("j1", JunctionPolicy::RoundRobin).unwrap();
        map.add_junction("j2", JunctionPolicy::RoundRobin).unwrap();
        map.add_road("r1", 100, 10, "j1", "j2", RoadKind::Lanes(2)).unwrap();
        // Least-loaded assignment: a → lane 0, b → lane 1, c → lane 0.
        let a = map.add_vehicle("a", 10, &itinerary(&["j1", "j2"])).unwrap();
        let b = map.add_vehicle("b", 10, &itinerary(&["j1", "j2"])).unwrap();
        let c = map.add_vehicle("c", 10, &itinerary(&["j1", "j2"])).unwrap();
        assert_eq!(map.vehicle(a).lane(), 0);
        assert_eq!(map.vehicle(b).lane(), 1);
        assert_eq!(map.vehicle(c).lane(), 0);

        map.make_vehicle_faulty("a", 5).unwrap();
        map.advance_roads();
        // c shares lane 0 with the fault: halved.  b rides lane 1: full speed.
        assert_eq!(map.vehicle(c).distance(), 5);
        assert_eq!(map.vehicle(b).distance(), 10);
    }
}

// ── Junction policies ─────────────────────────────────────────────────────────

mod junction_tests {
    use super::*;
    use crate::ids::RoadId;

    fn junction_with_roads(policy: JunctionPolicy, roads: u32) -> Junction {
        let mut j = Junction::new("jx".to_string(), policy);
        for r in 0..roads {
            j.add_incoming(RoadId(r));
        }
        j
    }

    fn assert_one_green(j: &Junction) {
        let greens = j.incoming().iter().filter(|ir| ir.is_green()).count();
        assert_eq!(greens, 1, "exactly one incoming road must be green");
    }

    #[test]
    fn empty_junction_ignores_advance() {
        let mut j = junction_with_roads(JunctionPolicy::RoundRobin, 0);
        let mut vehicles: Vec<Vehicle> = Vec::new();
        assert!(j.advance(&mut vehicles).is_none());
        assert!(j.green_index().is_none());
    }

    #[test]
    fn round_robin_rotates_every_tick() {
        let mut j = junction_with_roads(JunctionPolicy::RoundRobin, 3);
        let mut vehicles: Vec<Vehicle> = Vec::new();
        j.advance(&mut vehicles);
        assert_eq!(j.green_index(), Some(0));
        assert_one_green(&j);
        j.advance(&mut vehicles);
        assert_eq!(j.green_index(), Some(1));
        j.advance(&mut vehicles);
        assert_eq!(j.green_index(), Some(2));
        j.advance(&mut vehicles);
        assert_eq!(j.green_index(), Some(0));
        assert_one_green(&j);
    }

    #[test]
    fn green_road_releases_its_head_in_fifo_order() {
        let mut j = junction_with_roads(JunctionPolicy::RoundRobin, 1);
        let mut vehicles = vec![stub_vehicle("a"), stub_vehicle("b")];
        j.enter(RoadId(0), VehicleId(0));
        j.enter(RoadId(0), VehicleId(1));
        assert!(j.advance(&mut vehicles).is_none()); // takes green first
        assert_eq!(j.advance(&mut vehicles), Some(VehicleId(0)));
        assert_eq!(j.advance(&mut vehicles), Some(VehicleId(1)));
        assert_eq!(j.advance(&mut vehicles), None);
    }

    #[test]
    fn faulty_head_blocks_queue_but_burns_fault_ticks() {
        let mut j = junction_with_roads(JunctionPolicy::RoundRobin, 1);
        let mut vehicles = vec![stub_vehicle("a"), stub_vehicle("b")];
        vehicles[0].make_faulty(2);
        j.enter(RoadId(0), VehicleId(0));
        j.enter(RoadId(0), VehicleId(1));
        j.advance(&mut vehicles); // takes green; fault 2 → 1
        assert_eq!(vehicles[0].faulty_remaining(), 1);
        assert!(j.advance(&mut vehicles).is_none()); // head still faulty; 1 → 0
        assert_eq!(j.advance(&mut vehicles), Some(VehicleId(0)));
    }

    #[test]
    fn most_crowded_prefers_longest_queue_and_keeps_it() {
        // First road has 3 queued, second has 1.
        let mut j = junction_with_roads(JunctionPolicy::MostCrowded, 2);
        let mut vehicles: Vec<Vehicle> =
            (0..4).map(|i| stub_vehicle(&format!("v{i}"))).collect();
        j.enter(RoadId(0), VehicleId(0));
        j.enter(RoadId(0), VehicleId(1));
        j.enter(RoadId(0), VehicleId(2));
        j.enter(RoadId(1), VehicleId(3));

        assert!(j.advance(&mut vehicles).is_none());
        assert_eq!(j.green_index(), Some(0), "ra has the longest queue");
        assert_eq!(j.advance(&mut vehicles), Some(VehicleId(0)));
        assert_eq!(j.green_index(), Some(0), "ra still wins with 2 vs 1");
        assert_one_green(&j);
    }

    #[test]
    fn most_crowded_ties_break_by_insertion_order() {
        let mut j = junction_with_roads(JunctionPolicy::MostCrowded, 2);
        let mut vehicles = vec![stub_vehicle("a"), stub_vehicle("b")];
        j.enter(RoadId(0), VehicleId(0));
        j.enter(RoadId(1), VehicleId(1));
        j.advance(&mut vehicles);
        assert_eq!(j.green_index(), Some(0));
    }

    #[test]
    fn most_crowded_all_empty_falls_back_to_first() {
        let mut j = junction_with_roads(JunctionPolicy::MostCrowded, 3);
        let mut vehicles: Vec<Vehicle> = Vec::new();
        j.advance(&mut vehicles);
        assert_eq!(j.green_index(), Some(0));
    }

    #[test]
    fn time_slice_grows_interval_after_full_use() {
        // Two incoming roads, the first one's interval forced to 2, two
        // vehicles queued.  Both green ticks release, so the interval
        // grows to 3.
        let mut j = junction_with_roads(
            JunctionPolicy::TimeSlice { max_slice: 10, min_slice: 1 },
            2,
        );
        j.incoming_mut()[0].set_interval(2);
        let mut vehicles = vec![stub_vehicle("a"), stub_vehicle("b")];
        j.enter(RoadId(0), VehicleId(0));
        j.enter(RoadId(0), VehicleId(1));

        j.advance(&mut vehicles); // ra takes green
        assert_eq!(j.green_index(), Some(0));
        assert_eq!(j.advance(&mut vehicles), Some(VehicleId(0)));
        assert_eq!(j.green_index(), Some(0), "allocation of 2 keeps green");
        assert_eq!(j.advance(&mut vehicles), Some(VehicleId(1)));
        assert_eq!(j.green_index(), Some(1), "allocation exhausted, rotate");
        assert_eq!(j.incoming()[0].interval(), 3, "fully used → grow");
        assert_one_green(&j);
    }

    #[test]
    fn time_slice_shrinks_interval_when_unused() {
        let mut j = junction_with_roads(
            JunctionPolicy::TimeSlice { max_slice: 10, min_slice: 1 },
            2,
        );
        j.incoming_mut()[0].set_interval(3);
        let mut vehicles: Vec<Vehicle> = Vec::new();
        j.advance(&mut vehicles); // takes green
        for _ in 0..3 {
            j.advance(&mut vehicles); // three idle green ticks
        }
        assert_eq!(j.green_index(), Some(1));
        assert_eq!(j.incoming()[0].interval(), 2, "never used → shrink");
    }

    #[test]
    fn time_slice_interval_stays_within_bounds() {
        let mut j = junction_with_roads(
            JunctionPolicy::TimeSlice { max_slice: 2, min_slice: 2 },
            2,
        );
        let mut vehicles: Vec<Vehicle> = Vec::new();
        j.advance(&mut vehicles);
        for _ in 0..2 {
            j.advance(&mut vehicles);
        }
        assert_eq!(j.incoming()[0].interval(), 2, "min bound holds");
    }
}

// ── Full trips through the map ────────────────────────────────────────────────

mod trip_tests {
    use super::*;

    #[test]
    fn minimal_trip_takes_three_ticks() {
        // On road, then waiting, then arrived.
        let mut map = line_map();
        let vid = map.add_vehicle("v1", 10, &itinerary(&["j1", "j2"])).unwrap();

        tick(&mut map);
        assert_eq!(map.vehicle(vid).distance(), 10);
        assert!(matches!(map.vehicle(vid).location(), VehicleLocation::OnRoad(_)));

        tick(&mut map);
        assert!(matches!(map.vehicle(vid).location(), VehicleLocation::Waiting(_)));

        tick(&mut map);
        assert!(map.vehicle(vid).has_arrived());
        assert_eq!(map.vehicle(vid).kilometrage(), 20);
    }

    #[test]
    fn vehicle_crosses_onto_second_road() {
        let mut map = line_map();
        map.add_junction("j3", JunctionPolicy::RoundRobin).unwrap();
        map.add_road("r2", 15, 10, "j2", "j3", RoadKind::Plain).unwrap();
        let vid = map.add_vehicle("v1", 10, &itinerary(&["j1", "j2", "j3"])).unwrap();

        tick(&mut map); // 10 along r1
        tick(&mut map); // reaches j2's queue
        tick(&mut map); // released onto r2 at distance 0
        let v = map.vehicle(vid);
        assert_eq!(v.location(), VehicleLocation::OnRoad(map.road_id("r2").unwrap()));
        assert_eq!(v.distance(), 0);
        assert_eq!(v.itinerary_pos(), 1);

        tick(&mut map); // 10 along r2
        assert_eq!(map.vehicle(vid).distance(), 10);
    }

    #[test]
    fn vehicle_conservation_across_ticks() {
        let mut map = line_map();
        map.add_vehicle("v1", 10, &itinerary(&["j1", "j2"])).unwrap();
        map.add_vehicle("v2", 3, &itinerary(&["j1", "j2"])).unwrap();

        for _ in 0..12 {
            tick(&mut map);
            let on_roads: usize = map.roads().iter().map(|r| r.vehicles().len()).sum();
            let queued: usize = map
                .junctions()
                .iter()
                .flat_map(|j| j.incoming())
                .map(|ir| ir.queue_len())
                .sum();
            let arrived = map.vehicles().iter().filter(|v| v.has_arrived()).count();
            assert_eq!(on_roads + queued + arrived, 2);
        }
        assert!(map.vehicles().iter().all(|v| v.has_arrived()));
    }
}

// ── Reports and describe ──────────────────────────────────────────────────────

mod report_tests {
    use super::*;

    #[test]
    fn junction_report_lists_queues_in_insertion_order() {
        let mut map = line_map();
        map.add_road("rb", 10, 5, "j1", "j2", RoadKind::Plain).unwrap();
        map.advance_junctions().unwrap(); // j2 turns r1 green

        let j2 = map.junction(map.junction_id("j2").unwrap());
        let sec = j2.report(Tick(1), &map);
        assert_eq!(sec.tag(), "junction_report");
        assert_eq!(sec.get_value("id"), Some("j2"));
        assert_eq!(sec.get_value("time"), Some("1"));
        assert_eq!(sec.get_value("queues"), Some("(r1,green,[]),(rb,red,[])"));
    }

    #[test]
    fn empty_junction_report_has_empty_queues() {
        let map = {
            let mut m = RoadMap::new();
            m.add_junction("j1", JunctionPolicy::RoundRobin).unwrap();
            m
        };
        let sec = map.junctions()[0].report(Tick(0), &map);
        assert_eq!(sec.get_value("queues"), Some(""));
    }

    #[test]
    fn time_slice_green_shows_remaining() {
        let mut map = RoadMap::new();
        map.add_junction("j1", JunctionPolicy::RoundRobin).unwrap();
        map.add_junction(
            "jt",
            JunctionPolicy::TimeSlice { max_slice: 4, min_slice: 1 },
        )
        .unwrap();
        map.add_road("r1", 10, 5, "j1", "jt", RoadKind::Plain).unwrap();
        map.advance_junctions().unwrap(); // r1 takes green, interval 4
        let jt = map.junction(map.junction_id("jt").unwrap());
        let sec = jt.report(Tick(1), &map);
        assert_eq!(sec.get_value("queues"), Some("(r1,green:4,[])"));
    }

    #[test]
    fn road_report_orders_state_by_ascending_distance() {
        let mut map = line_map();
        map.add_vehicle("fast", 9, &itinerary(&["j1", "j2"])).unwrap();
        map.add_vehicle("slow", 4, &itinerary(&["j1", "j2"])).unwrap();
        map.advance_roads();
        let sec = map.roads()[0].report(Tick(1), &map);
        assert_eq!(sec.get_value("state"), Some("(slow,4),(fast,9)"));
    }

    #[test]
    fn vehicle_report_covers_all_locations() {
        let mut map = line_map();
        let vid = map.add_vehicle("v1", 10, &itinerary(&["j1", "j2"])).unwrap();

        tick(&mut map);
        let sec = map.vehicle(vid).report(Tick(1), &map);
        assert_eq!(sec.get_value("speed"), Some("10"));
        assert_eq!(sec.get_value("kilometrage"), Some("10"));
        assert_eq!(sec.get_value("faulty"), Some("0"));
        assert_eq!(sec.get_value("location"), Some("(r1,10)"));

        tick(&mut map);
        let sec = map.vehicle(vid).report(Tick(2), &map);
        assert_eq!(sec.get_value("location"), Some("(waiting,j2)"));

        tick(&mut map);
        let sec = map.vehicle(vid).report(Tick(3), &map);
        assert_eq!(sec.get_value("location"), Some("arrived"));
        assert_eq!(sec.get_value("speed"), Some("0"));
    }

    #[test]
    fn describe_rows_for_each_kind() {
        let mut map = line_map();
        map.add_vehicle("v1", 10, &itinerary(&["j1", "j2"])).unwrap();

        let road_rows = map.roads()[0].describe(&map);
        assert!(road_rows.contains(&("Source".to_string(), "j1".to_string())));
        assert!(road_rows.contains(&("Vehicles".to_string(), "[v1]".to_string())));

        let v_rows = map.vehicles()[0].describe(&map);
        assert!(v_rows.contains(&("Road".to_string(), "r1".to_string())));
        assert!(v_rows.contains(&("Itinerary".to_string(), "[j1,j2]".to_string())));

        let j_rows = map.junctions()[1].describe(&map);
        assert!(j_rows.contains(&("ID".to_string(), "j2".to_string())));
    }

    #[test]
    fn describe_queue_follows_light_without_separator() {
        let mut map = line_map();
        map.add_vehicle("v1", 30, &itinerary(&["j1", "j2"])).unwrap();
        let mut ticks = 0;
        while !matches!(map.vehicles()[0].location(), VehicleLocation::Waiting(_)) {
            tick(&mut map);
            ticks += 1;
            assert!(ticks < 10);
        }

        let j_rows = map.junctions()[1].describe(&map);
        assert!(j_rows.contains(&("Green".to_string(), "[(r1,green[v1])]".to_string())));
        assert!(j_rows.contains(&("Red".to_string(), "[]".to_string())));
    }
}
