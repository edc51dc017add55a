use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::domain::catalog::PricingModel;
use crate::domain::payment_option::{PaymentOption, PaymentOptionKind};

/// Named stages of the plan derivation pipeline.
///
/// Each billed amount is produced by an ordered sequence of these stages;
/// the recorded trace makes every quoted figure auditable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStep {
    /// Design fee stripped from the campaign total.
    CampaignCost,
    /// Commitment-window cost converted to the doubled-term rate.
    ExtendedTermRate,
    /// Base cost doubled for an extended-term prepayment.
    ExtendedTermTotal,
    /// Percentage discount applied.
    DiscountApplied,
    /// Percentage fee applied.
    FeeApplied,
    /// Amount divided across the installment count.
    InstallmentSplit,
    /// Per-installment design-fee share added back.
    InstallmentFeeShare,
    /// Per-installment design-fee share removed again.
    FeeShareRemoved,
    /// Per-installment amount multiplied back to the full term.
    TermRebuilt,
    /// Fixed fully-prepaid reduction for the longest term.
    PrepaidReduction,
    /// Full design fee added back once, undivided.
    DesignFeeAdded,
}

/// One recorded stage of a derivation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanStage {
    pub step: PlanStep,
    pub amount: Decimal,
}

/// Derived billing amount for one payment option.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanAmount {
    /// Amount billed per collection, in the smallest currency unit. May be
    /// negative when the design fee exceeds the campaign cost; callers treat
    /// that as a catalog misconfiguration, it is never clamped here.
    pub amount_cents: i64,
    /// Number of collections the amount is billed over.
    pub installments: i32,
    /// Ordered stages that produced the amount.
    pub trace: Vec<PlanStage>,
}

struct Pipeline {
    value: Decimal,
    trace: Vec<PlanStage>,
}

impl Pipeline {
    fn start(step: PlanStep, value: Decimal) -> Self {
        Self {
            value,
            trace: vec![PlanStage {
                step,
                amount: value,
            }],
        }
    }

    fn apply(mut self, step: PlanStep, f: impl FnOnce(Decimal) -> Decimal) -> Self {
        self.value = f(self.value);
        self.trace.push(PlanStage {
            step,
            amount: self.value,
        });
        self
    }

    fn finish(self, installments: i32) -> PlanAmount {
        let amount_cents = self
            .value
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .unwrap_or(i64::MAX);
        PlanAmount {
            amount_cents,
            installments,
            trace: self.trace,
        }
    }
}

/// Derive the billed amount for one payment option.
///
/// `total_cents` is the breakdown total including the one-off design fee;
/// `design_fee_cents` is that fee. The stage order is contractual: discount
/// multiplicatively before fee, each applied to the amount after the prior
/// stage, with the design fee re-apportioned per installment or re-added
/// once, undivided, for full payments.
pub fn derive_plan(
    total_cents: i64,
    option: &PaymentOption,
    model: PricingModel,
    design_fee_cents: i64,
) -> PlanAmount {
    let design_fee = Decimal::from(design_fee_cents);
    let installments = Decimal::from(option.min_installments.max(1));
    let term = Decimal::from(option.term_multiplier.max(1));

    let discount_factor = Decimal::ONE - option.discount_percent / Decimal::ONE_HUNDRED;
    let fee_factor = Decimal::ONE + option.fee_percent / Decimal::ONE_HUNDRED;

    let mut pipeline = Pipeline::start(
        PlanStep::CampaignCost,
        Decimal::from(total_cents) - design_fee,
    );

    match (model, option.kind) {
        // The stored promo cost covers the initial commitment window while
        // the collections run over the doubled term: halve the cost to the
        // doubled-term rate, then split it across the installments.
        (PricingModel::Repeat, kind) if kind.splits_installments() => {
            if option.term_multiplier > 1 {
                pipeline = pipeline.apply(PlanStep::ExtendedTermRate, |v| v / term);
            }
            pipeline
                .apply(PlanStep::DiscountApplied, |v| v * discount_factor)
                .apply(PlanStep::FeeApplied, |v| v * fee_factor)
                .apply(PlanStep::InstallmentSplit, |v| v / installments)
                .apply(PlanStep::InstallmentFeeShare, |v| v + design_fee / installments)
                .finish(option.min_installments)
        }
        // Promo full payments are rebuilt backwards from the quoted
        // installment figure: strip the apportioned fee share, multiply back
        // to the term, take the prepaid reduction, re-add the fee once.
        (PricingModel::Repeat, PaymentOptionKind::Single) => {
            if option.term_multiplier > 1 {
                pipeline = pipeline.apply(PlanStep::ExtendedTermRate, |v| v / term);
            }
            pipeline = pipeline
                .apply(PlanStep::DiscountApplied, |v| v * discount_factor)
                .apply(PlanStep::FeeApplied, |v| v * fee_factor)
                .apply(PlanStep::InstallmentSplit, |v| v / installments)
                .apply(PlanStep::InstallmentFeeShare, |v| v + design_fee / installments)
                .apply(PlanStep::FeeShareRemoved, |v| v - design_fee / installments)
                .apply(PlanStep::TermRebuilt, |v| v * installments);
            if option.prepaid_reduction_cents > 0 {
                pipeline = pipeline.apply(PlanStep::PrepaidReduction, |v| {
                    v - Decimal::from(option.prepaid_reduction_cents)
                });
            }
            pipeline
                .apply(PlanStep::DesignFeeAdded, |v| v + design_fee)
                .finish(1)
        }
        // Non-promo full payments for the extended term simply double the
        // base cost; no installment back-derivation.
        (_, PaymentOptionKind::Single) => {
            if option.term_multiplier > 1 {
                pipeline = pipeline.apply(PlanStep::ExtendedTermTotal, |v| v * term);
            }
            pipeline
                .apply(PlanStep::DiscountApplied, |v| v * discount_factor)
                .apply(PlanStep::FeeApplied, |v| v * fee_factor)
                .apply(PlanStep::DesignFeeAdded, |v| v + design_fee)
                .finish(1)
        }
        (_, _) => pipeline
            .apply(PlanStep::DiscountApplied, |v| v * discount_factor)
            .apply(PlanStep::FeeApplied, |v| v * fee_factor)
            .apply(PlanStep::InstallmentSplit, |v| v / installments)
            .apply(PlanStep::InstallmentFeeShare, |v| v + design_fee / installments)
            .finish(option.min_installments),
    }
}
