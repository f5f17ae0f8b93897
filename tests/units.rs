//! Velocity and impulse unit conversions.

use approx::assert_relative_eq;
use rstest::rstest;
use trundle::units::{
    cmps_to_vmiph, damage_to_impulse, impulse_to_damage, mps_to_vmiph, vmiph_to_cmps, vmiph_to_mps,
};

#[rstest]
#[case(0.0)]
#[case(1.0)]
#[case(8.94)]
#[case(26.8)]
#[case(-13.3)]
#[case(120.0)]
fn speeds_survive_a_round_trip_within_one_unit(#[case] mps: f64) {
    let back = vmiph_to_mps(mps_to_vmiph(mps));
    assert!((back - mps).abs() <= vmiph_to_mps(1), "{mps} came back as {back}");
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(999)]
#[case(-4000)]
#[case(8000)]
fn vmiph_survives_a_round_trip_exactly(#[case] vmiph: i32) {
    assert_eq!(mps_to_vmiph(vmiph_to_mps(vmiph)), vmiph);
}

#[rstest]
fn conversion_is_symmetric_in_sign() {
    for tenth in 0..500 {
        let mps = f64::from(tenth) / 10.0;
        assert_eq!(mps_to_vmiph(-mps), -mps_to_vmiph(mps));
    }
}

#[rstest]
#[case(0.0)]
#[case(12.5)]
#[case(37.5)]
#[case(4321.0)]
fn damage_and_impulse_invert_each_other(#[case] impulse: f64) {
    assert_relative_eq!(damage_to_impulse(impulse_to_damage(impulse)), impulse);
    assert_relative_eq!(impulse_to_damage(damage_to_impulse(impulse)), impulse);
}

#[rstest]
#[case(100, 224)]
#[case(-100, -224)]
#[case(0, 0)]
fn centimetres_per_second_use_the_same_scale(#[case] cmps: i32, #[case] vmiph: i32) {
    assert_eq!(cmps_to_vmiph(cmps), vmiph);
    assert_eq!(vmiph_to_cmps(vmiph), cmps);
}
