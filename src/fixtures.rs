//! MICHAUD family and patrimony shared by unit tests
//!
//! Values are constant so that every figure can be checked by hand:
//! legal estate of Lionel at the end of 2023 = 505 000 €.

use crate::clause::Clause;
use crate::family::{Family, Person};
use crate::fiscal::SpouseFiscalOption;
use crate::ownership::{Owners, Ownership};
use crate::patrimoine::{Asset, AssetKind, InvestmentType, Liability, LiabilityKind, Patrimoine, Valuation};

pub const YEAR: i32 = 2024;

pub const LIONEL: &str = "M. Lionel MICHAUD";
pub const VANESSA: &str = "Mme. Vanessa MICHAUD";
pub const ARTHUR: &str = "M. Arthur MICHAUD";
pub const LOU_ANN: &str = "Mme. Lou-Ann MICHAUD";

pub const AV_AFER: &str = "AV Lionel AFER";
pub const AV_GENERALI: &str = "AV Lionel Generali";
pub const AV_VANESSA: &str = "AV Vanessa Predica";

/// Lionel dies in 2024 aged 59; Vanessa is 56
pub fn michaud_family() -> Family {
    Family::new(vec![
        Person::adult(LIONEL, 1965, SpouseFiscalOption::FullUsufruct).dying_in(YEAR),
        Person::adult(VANESSA, 1968, SpouseFiscalOption::FullUsufruct),
        Person::child(ARTHUR, 1996),
        Person::child(LOU_ANN, 1998),
    ])
}

fn couple() -> Ownership {
    Ownership::full(Owners::from_shares([(LIONEL, 50.0), (VANESSA, 50.0)]))
}

fn children() -> Owners {
    Owners::from_shares([(ARTHUR, 50.0), (LOU_ANN, 50.0)])
}

fn life_insurance(name: &str, value: f64, clause: Clause, ownership: Ownership) -> Asset {
    Asset::new(
        name,
        AssetKind::FreeInvestment {
            investment_type: InvestmentType::LifeInsurance { clause },
        },
        Valuation::constant(YEAR - 1, value),
        ownership,
    )
}

pub fn michaud_patrimoine() -> Patrimoine {
    let assets = vec![
        // 500 000 * 80% * 50% = 200 000
        Asset::new(
            "Maison Lyon",
            AssetKind::RealEstate { is_main_residence: true },
            Valuation::constant(YEAR - 1, 500_000.0),
            couple(),
        ),
        Asset::new(
            "Appartement Nice",
            AssetKind::RealEstate { is_main_residence: false },
            Valuation::constant(YEAR - 1, 200_000.0),
            Ownership::sole(LIONEL),
        ),
        // 100 000 * 90% = 90 000
        Asset::new(
            "SCPI Pierre",
            AssetKind::Scpi { sale_fee_rate: 0.10 },
            Valuation::constant(YEAR - 1, 100_000.0),
            Ownership::sole(LIONEL),
        ),
        Asset::new(
            "PEA Lionel",
            AssetKind::FreeInvestment {
                investment_type: InvestmentType::Pea,
            },
            Valuation::constant(YEAR - 1, 80_000.0),
            Ownership::sole(LIONEL),
        ),
        life_insurance(
            AV_AFER,
            200_000.0,
            Clause::full(children()),
            Ownership::dismembered(
                Owners::from_shares([(LIONEL, 50.0), (VANESSA, 50.0)]),
                children(),
            ),
        ),
        life_insurance(
            AV_GENERALI,
            300_000.0,
            Clause::dismembered(VANESSA, &[ARTHUR, LOU_ANN]).optional(),
            Ownership::sole(LIONEL),
        ),
        life_insurance(
            AV_VANESSA,
            50_000.0,
            Clause::full(Owners::sole(LIONEL)),
            Ownership::sole(VANESSA),
        ),
    ];

    let liabilities = vec![
        // 20 yearly installments: 110 000 due at the end of 2023, half each
        Liability::new(
            "Prêt Maison Lyon",
            LiabilityKind::Loan {
                first_year: 2015,
                last_year: 2034,
            },
            200_000.0,
            couple(),
        ),
        Liability::new("Dette famille", LiabilityKind::Debt, 10_000.0, Ownership::sole(LIONEL)),
    ];

    Patrimoine::new(assets, liabilities)
}
