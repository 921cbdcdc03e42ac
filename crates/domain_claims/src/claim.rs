//! Claim-level enumerations

use core_kernel::define_enum;

define_enum! {
    /// Processing status of a claim
    pub enum ClaimStatus: "ClaimStatus" {
        NotSubmitted => ("NOT_SUBMITTED", "未提交"),
        ApplicationWaitAudit => ("CLAIM_APPLICATION_WAIT_AUDIT", "待审核索赔申请书"),
        ApplicationAudited => ("CLAIM_APPLICATION_AUDITED", "索赔申请书审核通过"),
        TemporarySaved => ("TEMPORARY_SAVED", "暂存待处理"),
        SystemAudited => ("SYSTEM_AUDITED", "系统审核通过"),
        SystemRejected => ("SYSTEM_REJECTED", "系统驳回"),
        WaitInsuranceCompanyAudit => ("WAIT_INSURANCE_COMPANY_AUDITED", "待保司审核"),
        InsuranceCompanyAccepted => ("INSURANCE_COMPANY_ACCEPTED", "保司受理中"),
        InsuranceCompanyRejected => ("INSURANCE_COMPANY_REJECTED", "保司驳回"),
        InsuranceCompanyCompleted => ("INSURANCE_COMPANY_COMPLETED", "保司已结案"),
        InsuranceCompanyAnnulOrRefused => ("INSURANCE_COMPANY_ANNUL_OR_REFUSED", "保司案件注销/拒赔"),
        Canceled => ("CANCELED", "已取消"),
    }
}

impl ClaimStatus {
    /// Returns true once the claim can no longer change
    pub fn is_closed(&self) -> bool {
        use ClaimStatus::*;
        matches!(
            self,
            InsuranceCompanyCompleted | InsuranceCompanyAnnulOrRefused | Canceled
        )
    }
}

define_enum! {
    /// Condition of the insured person at the time of the claim
    pub enum InsuredStatus: "InsuredStatus" {
        Recovery => ("RECOVERY", "痊愈"),
        UnderTreatment => ("UNDER_TREATMENT", "治疗中"),
        Death => ("DEATH", "身故"),
        Other => ("OTHER", "其他"),
    }
}

define_enum! {
    /// Public medical insurance scheme of the insured person
    pub enum MedicareType: "MedicareType" {
        Employee => ("EMPLOYEE", "城镇职工基本医疗保险"),
        Resident => ("RESIDENT", "城镇居民基本医疗保险"),
        NewRuralCooperative => ("NEW_RURAL_COOPERATIVE", "新型农村合作医疗保险"),
        Other => ("OTHER", "其它医疗保险"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Enumeration;

    #[test]
    fn test_claim_status_lookup() {
        assert_eq!(ClaimStatus::of("保司驳回"), Some(ClaimStatus::InsuranceCompanyRejected));
        assert_eq!(ClaimStatus::Canceled.value(), "CANCELED");
        assert!(ClaimStatus::Canceled.is_closed());
        assert!(!ClaimStatus::SystemRejected.is_closed());
    }

    #[test]
    fn test_medicare_type_names() {
        assert_eq!(MedicareType::Other.name(), "其它医疗保险");
        assert_eq!(InsuredStatus::of("DEATH"), Some(InsuredStatus::Death));
    }
}
