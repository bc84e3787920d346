/*
  Copyright 2017 Takashi Ogura

  Licensed under the Apache License, Version 2.0 (the "License");
  you may not use this file except in compliance with the License.
  You may obtain a copy of the License at

      http://www.apache.org/licenses/LICENSE-2.0

  Unless required by applicable law or agreed to in writing, software
  distributed under the License is distributed on an "AS IS" BASIS,
  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
  See the License for the specific language governing permissions and
  limitations under the License.
*/
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pipette_arm::*;

fn fk_benchmark(c: &mut Criterion) {
    let angles = JointAngles::from_degrees([30, -60, 45, -15, 80]);

    c.bench_function("world_transforms", |b| {
        b.iter(|| world_transforms(black_box(&angles), &ARM_GEOMETRY))
    });

    let arm = ArmChain::new(&ARM_GEOMETRY);
    c.bench_function("ArmChain::update_transforms", |b| {
        b.iter(|| {
            arm.set_angles(black_box(&angles));
            arm.update_transforms()
        })
    });
}

fn presenter_benchmark(c: &mut Criterion) {
    let mut engine = HeadlessEngine::new();
    let mut state = AppState::new();
    let size = SurfaceSize {
        width: 800,
        height: 600,
    };
    let mut presenter =
        Presenter::mount(&mut engine, size, &Environment::default(), &state.snapshot());
    let mut degrees = 0;
    c.bench_function("Presenter::apply joint change", |b| {
        b.iter(|| {
            degrees = (degrees + 1) % 90;
            state.update(Message::JointChanged {
                joint: JointId::Elbow,
                degrees,
            });
            presenter.apply(&mut engine, &state.snapshot()).unwrap()
        })
    });
}

criterion_group!(benches, fk_benchmark, presenter_benchmark);
criterion_main!(benches);
