//! Fixed marketing content: service pages and refund-status links.

/// A service page under `/services/<slug>`.
pub struct Service {
    pub slug: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

pub const SERVICES: &[Service] = &[
    Service {
        slug: "1040-tax-return-filing",
        title: "1040 & 1040 NR Tax Return Filing",
        description: "We have numerous EAs and CPAs who can prepare and file your tax returns with guaranteed refund.",
    },
    Service {
        slug: "unlimited-tax-consultations",
        title: "Unlimited Tax Consultations",
        description: "Here, we provide you integrated consultation on different kind of tax norms, we would like to remind you that anytime you can call us to speak with our Tax Experts for FREE to get solutions on your personal taxes. Our professional Tax Experts with highly experienced & skilled. We promise to guide you for all your taxation needs 365/7 days.",
    },
    Service {
        slug: "extension-filing",
        title: "Form 4868 Extension Filing",
        description: "If the tax payer does not want to file tax returns on or before the due date of tax filing which is April 15th, If you fail to file either a tax extension or tax return by the appropriate filing deadline, don't worry!! Being a professional tax preparer, we help you to figure out your tax situation and advise you on IRS instalment arrangements. A tax filing extension can also be useful for those who do not have necessary documentation available to complete their tax return. We here at Leo Tax Filing seek Extension upto 6 months which is October 15th to File Tax Returns.",
    },
    Service {
        slug: "itin-guidance",
        title: "ITIN Guidance and Support",
        description: "ITIN - Individual taxpayer identification number. ITIN is just used for personal tax related purposes. In order to apply ITIN for dependents (wife, kids, close relatives etc.), a dependent should have stayed in the USA for more than 183 days in the particular Tax Year.",
    },
    Service {
        slug: "fica-taxes-withdrawals",
        title: "FICA Taxes Withdrawals Guidance",
        description: "FICA - Federal Insurance Contributions Act. As per the IRS and USA tax laws students who are on F1, J1 visa need not pay any Social Security and Medicare taxes from their income, since they are considered as non-residents. The employer may withhold Social Security and Medicare Taxes from pay checks every month assuming that the employee might have to pay the taxes, We will provide you the relevant forms for free of cost which needs to be mailed to the IRS along with the letter from your employer stating that he/she has withheld Social Security and Medicare Taxes from your Pay Check by error, once the forms are mailed the IRS might take 06-12 months to refund the withheld taxes.",
    },
    Service {
        slug: "tax-planning",
        title: "Professional Tax Planning",
        description: "Tax planning can avoid any underpayment or excess payment from the pay checks towards the federal and state taxes. Our tax planning will help you not only in tax savings but it also helps you to take tax management decisions before the deadline of December 31st which can put your money in your pocket. Decision you make on your financial planning whether it is investments, insurance, education, housing, retirement or estate planning, our tax experts will hear you patiently and advise you on the tax savings Plans to save your precious time and money.",
    },
    Service {
        slug: "tax-expert-support",
        title: "Tax Expert Support for Notices, Audits & Enquiries",
        description: "According to United States tax laws, IRS and State income tax departments have every right to audit/check last 5 years of filed tax returns to ensure that the tax payers are Filing right tax returns as per the USA tax laws. The Tax payer has 30 days of time frame to respond to the notice, A tax professional local or through online sources the tax payer might have to pay per hour for support or solution. But our tax experts can understand about our client's requirements and expectations on their personal taxes and provide you free support for Notices, Audits & Enquiries received from IRS.",
    },
    Service {
        slug: "filed-tax-returns-assessment",
        title: "Filed Tax Returns Assessment & Examination",
        description: "Our expert team offers professional assistance in reviewing and assessing your previously filed tax returns to ensure accuracy and compliance with IRS regulations. We meticulously examine your tax filings for any discrepancies or missed deductions, helping you maximize your benefits while staying compliant.",
    },
    Service {
        slug: "accurate-tax-estimates",
        title: "Accurate Tax Estimates",
        description: "The tax estimates will go through three stages of evaluation, the first stage of evaluation will be done by our tax analyst, second stage of evaluation is done by our EA- Enrolled Agent and the third stage of evaluation is done by our CPA- Certified Public Accountant which ensures that the tax estimate is 100% accurate with tax refunds guarantee. The online tax filing websites and local tax consultants would just give you a final figure of our OWE/Refund Amount, but We will provide you with the entire tax returns and line by line calculations. We ensure you that your tax issues are always taken care with unlimited tax expert's support for present and previously filed tax return.",
    },
    Service {
        slug: "fbar-fatca-filing",
        title: "FBAR & FATCA Filing",
        description: "FBAR: Foreign Bank Account Report. FATCA: Foreign Account Tax Compliance Act. Lack of tax knowledge majority of the taxpayers who are from foreign countries are not disclosing their foreign earned and unearned income on US tax returns, non-reporting of FBAR & FATCA with FinCEN (Financial Crimes Enforcement Network) will leads to huge penalties. Any taxpayer who is filing Form 1040 & 1040SR and having a signature authority of a foreign financial account need to disclose all types of foreign income on US tax returns, if you have any one or multiple below mentioned foreign financial accounts exceeding $10,000 need to file FBAR and if it exceeds $75,000 need to File FATCA with FinCEN.",
    },
    Service {
        slug: "w4-assistance",
        title: "W4 Assistance",
        description: "Most of the taxpayers are not fully aware of submitting form W4 with their employers, incomplete information on form W4 leads to higher/lower tax withholding. Your tax deductions on your pay check and form W2 is entirely based on the information you provide to your employer. You have to mention your correct state residency details, filing status, allowances, dependents details so that your tax withholding is done exactly.",
    },
];

/// IRS "Where's My Refund" tool.
pub const IRS_REFUND_URL: &str = "https://sa.www4.irs.gov/wmr/";

/// State revenue departments, alphabetical.
pub const STATE_REVENUE_SITES: &[(&str, &str)] = &[
    ("Alabama", "https://www.revenue.alabama.gov/"),
    ("Alaska", "https://dor.alaska.gov/"),
    ("Arizona", "https://azdor.gov/"),
    ("Arkansas", "https://www.dfa.arkansas.gov/income-tax"),
    ("California", "https://www.ftb.ca.gov/"),
    ("Colorado", "https://tax.colorado.gov/"),
    ("Connecticut", "https://portal.ct.gov/drs"),
    ("Delaware", "https://revenue.delaware.gov/"),
    ("District of Columbia", "https://otr.cfo.dc.gov/"),
    ("Florida", "https://floridarevenue.com/"),
    ("Georgia", "https://dor.georgia.gov/"),
    ("Hawaii", "https://tax.hawaii.gov/"),
    ("Idaho", "https://tax.idaho.gov/"),
    ("Illinois", "https://tax.illinois.gov/"),
    ("Indiana", "https://www.in.gov/dor/"),
    ("Iowa", "https://tax.iowa.gov/"),
    ("Kansas", "https://www.ksrevenue.gov/"),
    ("Kentucky", "https://revenue.ky.gov/"),
    ("Louisiana", "https://revenue.louisiana.gov/"),
    ("Maine", "https://www.maine.gov/revenue/"),
    ("Maryland", "https://www.marylandtaxes.gov/"),
    ("Massachusetts", "https://www.mass.gov/orgs/massachusetts-department-of-revenue"),
    ("Michigan", "https://www.michigan.gov/treasury"),
    ("Minnesota", "https://www.revenue.state.mn.us/"),
    ("Mississippi", "https://www.dor.ms.gov/"),
    ("Missouri", "https://dor.mo.gov/"),
    ("Montana", "https://mtrevenue.gov/"),
    ("Nebraska", "https://revenue.nebraska.gov/"),
    ("Nevada", "https://tax.nv.gov/"),
    ("New Hampshire", "https://www.revenue.nh.gov/"),
    ("New Jersey", "https://www.nj.gov/treasury/taxation/"),
    ("New Mexico", "https://www.tax.newmexico.gov/"),
    ("New York", "https://www.tax.ny.gov/"),
    ("North Carolina", "https://www.ncdor.gov/"),
    ("North Dakota", "https://www.tax.nd.gov/"),
    ("Ohio", "https://tax.ohio.gov/"),
    ("Oklahoma", "https://oklahoma.gov/tax.html"),
    ("Oregon", "https://www.oregon.gov/dor"),
    ("Pennsylvania", "https://www.revenue.pa.gov/"),
    ("Rhode Island", "https://tax.ri.gov/"),
    ("South Carolina", "https://dor.sc.gov/"),
    ("South Dakota", "https://dor.sd.gov/"),
    ("Tennessee", "https://www.tn.gov/revenue.html"),
    ("Texas", "https://comptroller.texas.gov/"),
    ("Utah", "https://tax.utah.gov/"),
    ("Vermont", "https://tax.vermont.gov/"),
    ("Virginia", "https://www.tax.virginia.gov/"),
    ("Washington", "https://dor.wa.gov/"),
    ("West Virginia", "https://tax.wv.gov/"),
    ("Wisconsin", "https://www.revenue.wi.gov/"),
    ("Wyoming", "https://revenue.wyo.gov/"),
];

pub fn find_service(slug: &str) -> Option<&'static Service> {
    SERVICES.iter().find(|s| s.slug == slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_slugs_unique() {
        assert_eq!(SERVICES.len(), 11);
        let mut slugs: Vec<_> = SERVICES.iter().map(|s| s.slug).collect();
        slugs.sort_unstable();
        slugs.dedup();
        assert_eq!(slugs.len(), SERVICES.len());
    }

    #[test]
    fn test_find_service() {
        let s = find_service("extension-filing").unwrap();
        assert_eq!(s.title, "Form 4868 Extension Filing");
        assert!(find_service("nope").is_none());
    }

    #[test]
    fn test_state_sites() {
        assert_eq!(STATE_REVENUE_SITES.len(), 51);
        assert!(STATE_REVENUE_SITES.iter().all(|(_, url)| url.starts_with("https://")));
    }
}
