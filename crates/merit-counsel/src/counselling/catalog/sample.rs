use super::{Catalog, Institution, Program, ProgramCutoffs, SeatAllotment};
use crate::counselling::domain::Category;

fn cutoffs(values: [f64; 8]) -> ProgramCutoffs {
    Category::ALL
        .into_iter()
        .zip(values)
        .fold(ProgramCutoffs::new(), |table, (category, cutoff)| {
            table.with(category, cutoff)
        })
}

fn seats(capacity: u32, closing_ranks: [u32; 8]) -> SeatAllotment {
    Category::ALL
        .into_iter()
        .zip(closing_ranks)
        .fold(SeatAllotment::new(capacity), |seats, (category, rank)| {
            seats.with_cutoff(category, rank)
        })
}

impl Catalog {
    /// Small built-in catalog used when no CSV is configured, and by the demo.
    pub fn sample() -> Self {
        let institutions = vec![
            Institution::new(
                "CEG",
                "College of Engineering, Guindy",
                vec![
                    Program::new("CSE", "Computer Science and Engineering")
                        .with_cutoffs(cutoffs([
                            199.5, 199.0, 198.5, 198.0, 197.5, 195.0, 192.0, 188.0,
                        ]))
                        .with_seats(seats(120, [150, 420, 610, 700, 760, 2100, 2900, 4100])),
                    Program::new("ECE", "Electronics and Communication Engineering")
                        .with_cutoffs(cutoffs([
                            198.0, 197.0, 196.5, 196.0, 195.0, 192.0, 188.0, 184.0,
                        ]))
                        .with_seats(seats(90, [600, 1300, 1650, 1900, 2050, 4800, 6200, 7700])),
                    Program::new("MECH", "Mechanical Engineering")
                        .with_seats(seats(120, [1800, 3100, 3600, 4200, 4500, 9800, 12500, 15000])),
                ],
            ),
            Institution::new(
                "MIT",
                "Madras Institute of Technology",
                vec![
                    Program::new("AERO", "Aeronautical Engineering")
                        .with_cutoffs(cutoffs([
                            196.0, 194.5, 194.0, 193.0, 192.5, 188.0, 184.0, 180.0,
                        ]))
                        .with_seats(seats(60, [1100, 2300, 2800, 3100, 3400, 7800, 9900, 12000])),
                    Program::new("IT", "Information Technology (B.Tech)")
                        .with_seats(seats(60, [900, 1900, 2300, 2600, 2800, 6600, 8500, 10400])),
                ],
            ),
            Institution::new(
                "PSG",
                "PSG College of Technology",
                vec![
                    Program::new("CSE", "Computer Science and Engineering")
                        .with_seats(seats(180, [700, 1500, 1850, 2100, 2300, 5200, 6900, 8600])),
                    Program::new("RAE", "Robotics and Automation Engineering")
                        .with_seats(seats(60, [2600, 4700, 5300, 6100, 6600, 13800, 17600, 21000])),
                ],
            ),
            Institution::new(
                "MMC",
                "Madras Medical College",
                vec![
                    Program::new("MBBS", "MBBS")
                        .with_cutoffs(cutoffs([
                            196.5, 195.0, 194.0, 193.5, 192.5, 188.0, 183.0, 179.0,
                        ]))
                        .with_seats(seats(250, [120, 380, 520, 610, 680, 1900, 2600, 3400])),
                    Program::new("BPHARM", "Bachelor of Pharmacy")
                        .with_seats(seats(60, [2900, 5200, 6100, 6800, 7300, 14500, 18300, 22000])),
                ],
            ),
            Institution::new(
                "LOY",
                "Loyola College",
                vec![
                    Program::new("BCOM", "B.Com (General)"),
                    Program::new("ZOO", "B.Sc Zoology"),
                    Program::new("BA-ENG", "BA English Literature"),
                ],
            ),
            Institution::new(
                "PRC",
                "Presidency College",
                vec![
                    Program::new("PHY", "B.Sc Physics"),
                    Program::new("HIS", "BA History"),
                ],
            ),
        ];

        Catalog { institutions }
    }
}
